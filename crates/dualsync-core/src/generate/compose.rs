//! `docker-compose.yml` for the selected database engine

use crate::stack::Database;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

pub const COMPOSE_VERSION: &str = "3.8";

#[derive(Debug, Serialize)]
struct ComposeFile {
    version: &'static str,
    services: BTreeMap<&'static str, Service>,
    volumes: BTreeMap<&'static str, Mapping>,
}

#[derive(Debug, Serialize)]
struct Service {
    image: &'static str,
    container_name: String,
    restart: &'static str,
    environment: Mapping,
    ports: Vec<String>,
    volumes: Vec<String>,
    healthcheck: Healthcheck,
}

#[derive(Debug, Serialize)]
struct Healthcheck {
    test: Vec<&'static str>,
    interval: &'static str,
    timeout: &'static str,
    retries: u32,
}

/// Fixed parameters of one containerized engine
struct Engine {
    service: &'static str,
    image: &'static str,
    port: u16,
    volume: &'static str,
    data_dir: &'static str,
    environment: &'static [(&'static str, &'static str)],
    healthcheck: &'static [&'static str],
}

const POSTGRES: Engine = Engine {
    service: "postgres",
    image: "postgres:15-alpine",
    port: 5432,
    volume: "postgres_data",
    data_dir: "/var/lib/postgresql/data",
    environment: &[
        ("POSTGRES_USER", "user"),
        ("POSTGRES_PASSWORD", "password"),
        ("POSTGRES_DB", "my_database"),
    ],
    healthcheck: &["CMD-SHELL", "pg_isready -U user"],
};

const MARIADB: Engine = Engine {
    service: "mariadb",
    image: "mariadb:latest",
    port: 3306,
    volume: "mariadb_data",
    data_dir: "/var/lib/mysql",
    environment: &[
        ("MARIADB_ROOT_PASSWORD", "root"),
        ("MARIADB_DATABASE", "my_database"),
        ("MARIADB_USER", "user"),
        ("MARIADB_PASSWORD", "password"),
    ],
    healthcheck: &["CMD", "mysqladmin", "ping", "-h", "127.0.0.1"],
};

fn engine(database: Database) -> Option<&'static Engine> {
    match database {
        Database::PostgreSql => Some(&POSTGRES),
        Database::MariaDb => Some(&MARIADB),
        Database::Sqlite | Database::None => None,
    }
}

/// Render the compose document, or `None` when the database needs no container
pub fn generate(database: Database) -> Result<Option<String>, serde_yaml::Error> {
    let Some(engine) = engine(database) else {
        return Ok(None);
    };

    let environment = engine
        .environment
        .iter()
        .map(|(k, v)| (Value::from(*k), Value::from(*v)))
        .collect::<Mapping>();

    let service = Service {
        image: engine.image,
        container_name: format!("{}_container", database.id().to_lowercase()),
        restart: "unless-stopped",
        environment,
        ports: vec![format!("{0}:{0}", engine.port)],
        volumes: vec![format!("{}:{}", engine.volume, engine.data_dir)],
        healthcheck: Healthcheck {
            test: engine.healthcheck.to_vec(),
            interval: "10s",
            timeout: "5s",
            retries: 5,
        },
    };

    let file = ComposeFile {
        version: COMPOSE_VERSION,
        services: BTreeMap::from([(engine.service, service)]),
        volumes: BTreeMap::from([(engine.volume, Mapping::new())]),
    };

    serde_yaml::to_string(&file).map(Some)
}
