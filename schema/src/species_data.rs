use crate::creature::resource_id;
use serde::{Deserialize, Serialize};

/// Species-level facts shared by all forms of a creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub id: u32,
    pub name: String,
    pub generation: String,
    pub color: String,
    pub habitat: Option<String>,
    pub capture_rate: u8,
    pub evolution_chain_url: Option<String>,
}

impl SpeciesInfo {
    pub fn evolution_chain_id(&self) -> Option<u32> {
        self.evolution_chain_url.as_deref().and_then(resource_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub species: String,
    pub evolves_to: Vec<EvolutionNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionChain {
    pub id: u32,
    pub root: EvolutionNode,
}

impl EvolutionChain {
    /// Species names grouped by evolution stage, base form first.
    /// Branching evolutions (eevee) share a stage.
    pub fn stages(&self) -> Vec<Vec<&str>> {
        let mut stages = Vec::new();
        let mut current: Vec<&EvolutionNode> = vec![&self.root];

        while !current.is_empty() {
            stages.push(current.iter().map(|node| node.species.as_str()).collect());
            current = current
                .iter()
                .flat_map(|node| node.evolves_to.iter())
                .collect();
        }

        stages
    }

    pub fn contains(&self, species: &str) -> bool {
        self.stages()
            .iter()
            .any(|stage| stage.iter().any(|name| *name == species))
    }
}
