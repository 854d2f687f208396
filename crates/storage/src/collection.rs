/// The named collections the record store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    RawMaterials,
    Recipes,
    ProductionLog,
    /// Derived from the production log on every read; never stored.
    Reports,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Self::RawMaterials,
        Self::Recipes,
        Self::ProductionLog,
        Self::Reports,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::RawMaterials => "rawMaterials",
            Self::Recipes => "recipes",
            Self::ProductionLog => "productionLog",
            Self::Reports => "reports",
        }
    }

    pub fn is_persisted(&self) -> bool {
        !matches!(self, Self::Reports)
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    Missing,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    Defaulted(DefaultReason),
}

/// A collection value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub source: LoadSource,
}

impl<T> Loaded<T> {
    pub fn stored(value: T) -> Self {
        Self {
            value,
            source: LoadSource::Stored,
        }
    }

    pub fn defaulted(value: T, reason: DefaultReason) -> Self {
        Self {
            value,
            source: LoadSource::Defaulted(reason),
        }
    }

    pub fn used_default(&self) -> bool {
        matches!(self.source, LoadSource::Defaulted(_))
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
