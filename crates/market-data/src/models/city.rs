use serde::Serialize;

use super::types::{CityId, CityName};

/// Cities covered by the Jakarta price report, in the order they are queried.
const JAKARTA_CITIES: &[(CityId, &str)] = &[
    (9, "Bekasi"),
    (8, "Tangerang"),
    (7, "Bogor"),
    (5, "Jakarta Utara"),
    (3, "Jakarta Selatan"),
    (4, "Jakarta Timur"),
    (2, "Jakarta Pusat"),
    (1, "Jakarta Barat"),
];

/// A city the report can be queried for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CityIdentity {
    pub city_id: CityId,
    pub city_name: CityName,
}

impl CityIdentity {
    pub fn new(city_id: CityId, city_name: impl Into<CityName>) -> Self {
        Self {
            city_id,
            city_name: city_name.into(),
        }
    }

    /// Identity for an id outside the known set.
    pub fn unknown(city_id: CityId) -> Self {
        Self {
            city_id,
            city_name: CityName::Owned(format!("ID {} (Unknown)", city_id)),
        }
    }
}

/// Ordered set of cities to fetch.
///
/// Iteration follows insertion order, which is also the order rows appear in
/// each month of the exported dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CitySet {
    cities: Vec<CityIdentity>,
}

impl CitySet {
    pub fn new() -> Self {
        Self { cities: Vec::new() }
    }

    /// The eight cities published by the Jakarta price report.
    pub fn jakarta() -> Self {
        Self {
            cities: JAKARTA_CITIES
                .iter()
                .map(|(id, name)| CityIdentity::new(*id, *name))
                .collect(),
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (CityId, S)>,
        S: Into<CityName>,
    {
        let mut set = Self::new();
        for (id, name) in pairs {
            set.insert(id, name);
        }
        set
    }

    /// Add a city, or rename it in place if the id is already present.
    pub fn insert(&mut self, city_id: CityId, city_name: impl Into<CityName>) {
        let city_name = city_name.into();
        match self.cities.iter_mut().find(|c| c.city_id == city_id) {
            Some(existing) => existing.city_name = city_name,
            None => self.cities.push(CityIdentity {
                city_id,
                city_name,
            }),
        }
    }

    pub fn get(&self, city_id: CityId) -> Option<&CityIdentity> {
        self.cities.iter().find(|c| c.city_id == city_id)
    }

    /// Resolve an id to its identity, falling back to a placeholder name.
    pub fn resolve(&self, city_id: CityId) -> CityIdentity {
        self.get(city_id)
            .cloned()
            .unwrap_or_else(|| CityIdentity::unknown(city_id))
    }

    /// Build a subset in the order given. Unknown ids are kept with a placeholder name.
    pub fn select(&self, ids: &[CityId]) -> Self {
        let mut set = Self::new();
        for id in ids {
            let identity = self.resolve(*id);
            set.insert(identity.city_id, identity.city_name);
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = &CityIdentity> {
        self.cities.iter()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl<'a> IntoIterator for &'a CitySet {
    type Item = &'a CityIdentity;
    type IntoIter = std::slice::Iter<'a, CityIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.cities.iter()
    }
}
