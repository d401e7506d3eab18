use std::env;

use devlink_common::EnvVars;

pub struct PostgresEnv {
    pub database_url: String,
}

impl EnvVars for PostgresEnv {
    fn load() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap(),
        }
    }

    fn get_env_var(&self, key: &str) -> String {
        match key {
            "DATABASE_URL" => self.database_url.clone(),
            _ => panic!("Invalid environment variable: {}", key),
        }
    }
}
