//! Position catalog: the fixed set of roster positions and their Discord roles.
//!
//! The catalog is built once from configuration and shared by the roster service and the
//! role reconciler, so the position→role mapping exists in exactly one place.

/// Static description of one roster position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSpec {
    /// Stable key used in commands and storage (e.g. `boss`).
    pub key: String,
    /// Display name.
    pub name: String,
    pub description: String,
    /// Maximum number of members the position can hold.
    pub max_members: usize,
    /// Discord role granted to members of this position, if any.
    pub role_id: Option<u64>,
}

impl PositionSpec {
    pub fn new(key: &str, name: &str, description: &str, max_members: usize) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            max_members,
            role_id: None,
        }
    }
}

/// Ordered set of positions plus legacy key aliases.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionCatalog {
    positions: Vec<PositionSpec>,
    /// `(legacy key, canonical key)` pairs, applied when loading stored members.
    aliases: Vec<(String, String)>,
}

impl PositionCatalog {
    pub fn new(positions: Vec<PositionSpec>) -> Self {
        Self {
            positions,
            aliases: Vec::new(),
        }
    }

    /// Maps a retired position key onto a current one.
    pub fn with_alias(mut self, legacy: &str, canonical: &str) -> Self {
        self.aliases
            .push((legacy.to_string(), canonical.to_string()));
        self
    }

    pub fn positions(&self) -> &[PositionSpec] {
        &self.positions
    }

    pub fn get(&self, key: &str) -> Option<&PositionSpec> {
        self.positions.iter().find(|p| p.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PositionSpec> {
        self.positions.iter_mut().find(|p| p.key == key)
    }

    /// Resolves a stored key to its canonical position key, following aliases.
    pub fn resolve<'a>(&'a self, key: &str) -> Option<&'a str> {
        if let Some(spec) = self.get(key) {
            return Some(spec.key.as_str());
        }
        self.aliases
            .iter()
            .find(|(legacy, _)| legacy == key)
            .and_then(|(_, canonical)| self.get(canonical))
            .map(|spec| spec.key.as_str())
    }

    /// Every distinct role id managed by the roster, in catalog order.
    ///
    /// Several positions may share one role; it is listed once.
    pub fn tracked_role_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = Vec::new();
        for role_id in self.positions.iter().filter_map(|p| p.role_id) {
            if !ids.contains(&role_id) {
                ids.push(role_id);
            }
        }
        ids
    }
}

impl Default for PositionCatalog {
    /// The Castilla family hierarchy with its default capacities.
    ///
    /// Roles are left unmapped; they are supplied by configuration.
    fn default() -> Self {
        Self::new(vec![
            PositionSpec::new(
                "boss",
                "👑 Le Patron (Boss)",
                "Highest leader of the Castilla family",
                1,
            ),
            PositionSpec::new(
                "godmother",
                "💎 La Marraine (Godmother)",
                "Godmother of the Castilla family",
                1,
            ),
            PositionSpec::new(
                "advisor",
                "🎯 Le Conseiller (Advisor)",
                "Advisors of the Castilla family",
                5,
            ),
            PositionSpec::new(
                "captain",
                "⚔️ Les Capitaines (Captains)",
                "Operational captains of the Castilla family",
                5,
            ),
            PositionSpec::new(
                "broker",
                "💼 Les Brokers (Brokers)",
                "Business brokers of the Castilla family",
                35,
            ),
            PositionSpec::new(
                "recruit",
                "🤝 Les Recrues (Recruit)",
                "Recruits of the Castilla family",
                50,
            ),
        ])
        .with_alias("soldier", "broker")
    }
}
