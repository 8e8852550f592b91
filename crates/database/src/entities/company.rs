//! Company entity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub catch_phrase: Option<String>,
    pub bs: Option<String>,
}

impl CompanyChanges {
    pub fn complete(&self) -> Option<Company> {
        Some(Company {
            name: self.name.clone()?,
            catch_phrase: self.catch_phrase.clone()?,
            bs: self.bs.clone()?,
        })
    }
}
