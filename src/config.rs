use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    MariaDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "sqlite" => Ok(StorageBackend::Sqlite),
            "mariadb" | "mysql" => Ok(StorageBackend::MariaDb),
            other => Err(format!("unknown storage backend [{}]", other)),
        }
    }
}

impl StorageBackend {
    pub fn from_env() -> Self {
        std::env::var("CATAN_STORAGE")
            .unwrap_or_default()
            .parse()
            .expect("CATAN_STORAGE must be sqlite or mariadb")
    }
}
