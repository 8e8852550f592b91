//! Address and geo entities

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Option<Geo>,
}

/// Coordinates kept as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, Default)]
pub struct AddressChanges {
    pub street: Option<String>,
    pub suite: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub geo: Option<GeoChanges>,
}

impl AddressChanges {
    /// Builds a full address when every field is present.
    pub fn complete(&self) -> Option<Address> {
        let geo = match &self.geo {
            Some(geo) => Some(geo.complete()?),
            None => None,
        };

        Some(Address {
            street: self.street.clone()?,
            suite: self.suite.clone()?,
            city: self.city.clone()?,
            zipcode: self.zipcode.clone()?,
            geo,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeoChanges {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl GeoChanges {
    pub fn complete(&self) -> Option<Geo> {
        Some(Geo {
            lat: self.lat.clone()?,
            lng: self.lng.clone()?,
        })
    }
}
