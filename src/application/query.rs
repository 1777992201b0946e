//! Inventory query parameters
//!
//! Maps named filters onto the CED inventory endpoint's wire keys.

/// Filters for an inventory query.
///
/// List-valued filters are sent as repeated keys (`t=IOC&t=Magnet`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryQuery {
    /// Element types (`t`)
    pub types: Option<Vec<String>>,
    /// Name include patterns (`nx`)
    pub name_nx: Option<Vec<String>>,
    /// Name exclude patterns (`ng`)
    pub name_ng: Option<Vec<String>>,
    /// Property existence filters (`Ex`)
    pub prop_ex: Option<Vec<String>>,
    /// Property value filters (`Ea`)
    pub prop_ea: Option<Vec<String>>,
    /// History dates (`d`)
    pub date: Option<Vec<String>>,
    /// Zones (`z`)
    pub zone: Option<Vec<String>>,
    /// Properties to return (`p`)
    pub properties: Option<Vec<String>>,
    /// Sort order (`s`)
    pub sort: Option<String>,
    /// Repeat multipass elements (`r=1`)
    pub repeat_multipass: bool,
    /// Expert parameters passed through verbatim
    pub extra: Vec<(String, String)>,
}

fn owned<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl InventoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types<I: IntoIterator<Item = S>, S: Into<String>>(mut self, types: I) -> Self {
        self.types = Some(owned(types));
        self
    }

    pub fn name_nx<I: IntoIterator<Item = S>, S: Into<String>>(mut self, patterns: I) -> Self {
        self.name_nx = Some(owned(patterns));
        self
    }

    pub fn name_ng<I: IntoIterator<Item = S>, S: Into<String>>(mut self, patterns: I) -> Self {
        self.name_ng = Some(owned(patterns));
        self
    }

    pub fn prop_ex<I: IntoIterator<Item = S>, S: Into<String>>(mut self, filters: I) -> Self {
        self.prop_ex = Some(owned(filters));
        self
    }

    pub fn prop_ea<I: IntoIterator<Item = S>, S: Into<String>>(mut self, filters: I) -> Self {
        self.prop_ea = Some(owned(filters));
        self
    }

    pub fn zone<I: IntoIterator<Item = S>, S: Into<String>>(mut self, zones: I) -> Self {
        self.zone = Some(owned(zones));
        self
    }

    pub fn properties<I: IntoIterator<Item = S>, S: Into<String>>(mut self, props: I) -> Self {
        self.properties = Some(owned(props));
        self
    }

    pub fn date<I: IntoIterator<Item = S>, S: Into<String>>(mut self, dates: I) -> Self {
        self.date = Some(owned(dates));
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn repeat_multipass(mut self, repeat: bool) -> Self {
        self.repeat_multipass = repeat;
        self
    }

    /// Add an expert parameter not covered by the named filters.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Wire parameters for a query against `catalog` in `workspace`.
    ///
    /// Always starts with `out=json`, `ced` and `wrkspc`. An expert parameter
    /// with one of those keys replaces the base value instead of repeating it.
    pub fn to_params(&self, catalog: &str, workspace: &str) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("out".into(), "json".into()),
            ("ced".into(), catalog.into()),
            ("wrkspc".into(), workspace.into()),
        ];

        for (key, value) in &self.extra {
            let base = params.iter().take(3).position(|(k, _)| k == key);
            match base {
                Some(idx) => params[idx].1 = value.clone(),
                None => params.push((key.clone(), value.clone())),
            }
        }

        let lists = [
            ("p", &self.properties),
            ("z", &self.zone),
            ("t", &self.types),
            ("nx", &self.name_nx),
            ("ng", &self.name_ng),
            ("Ex", &self.prop_ex),
            ("Ea", &self.prop_ea),
            ("d", &self.date),
        ];
        for (key, values) in lists {
            if let Some(values) = values {
                params.extend(values.iter().map(|v| (key.to_string(), v.clone())));
            }
        }

        if let Some(sort) = &self.sort {
            params.push(("s".into(), sort.clone()));
        }
        if self.repeat_multipass {
            params.push(("r".into(), "1".into()));
        }

        params
    }
}
