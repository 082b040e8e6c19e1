use crate::data::persistence::{Format, Persistable};
use serde::{Deserialize, Serialize};

/// A staff member or client that leave can be booked against.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: String,
    pub display_name: String,
}

impl Owner {
    pub fn new(id: &str, display_name: &str) -> Self {
        Owner {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// Read-only source of the people a leave event may belong to.
pub trait OwnerDirectory {
    fn owners(&self) -> &[Owner];

    fn contains(&self, id: &str) -> bool {
        self.owners().iter().any(|o| o.id == id)
    }

    fn display_name(&self, id: &str) -> Option<&str> {
        self.owners()
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.display_name.as_str())
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct OwnerData {
    pub owners: Vec<Owner>,
}

impl Persistable for OwnerData {
    fn filename() -> &'static str {
        "owners.yaml"
    }
    fn format() -> Format {
        Format::Yaml
    }
}

impl OwnerDirectory for OwnerData {
    fn owners(&self) -> &[Owner] {
        &self.owners
    }
}

impl OwnerData {
    pub fn add(&mut self, owner: Owner) {
        self.owners.push(owner);
    }

    /// Case-insensitive match on id or display name. An empty query returns everyone.
    pub fn search(&self, query: &str) -> Vec<&Owner> {
        let q = query.trim().to_lowercase();
        self.owners
            .iter()
            .filter(|o| {
                q.is_empty()
                    || o.display_name.to_lowercase().contains(&q)
                    || o.id.to_lowercase().contains(&q)
            })
            .collect()
    }
}
