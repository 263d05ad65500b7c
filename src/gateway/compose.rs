use docker_compose_types::{
    Compose, ComposeNetworks, ComposeVolume, DependsOnOptions, Environment, Labels, MapOrEmpty,
    NetworkSettings, Networks, Ports, Service, Services, TopLevelVolumes, Volumes,
};
use indexmap::IndexMap;

use crate::config::Config;
use crate::error::ProvisionResult;
use crate::gateway::{
    DB_IMAGE, DB_NAME, DB_SERVICE, DB_USER, GATEWAY_INTERNAL_PORT, GATEWAY_SERVICE, GUACD_IMAGE,
    GUACD_SERVICE, IMAGE_TAG, INITDB_DIR,
};

const NETWORK: &str = "guacamole-network";
const DB_VOLUME: &str = "mysql-data";

/// Render the three-service `docker-compose.yml`: guacd, MySQL
/// and the custom Guacamole image.
pub fn render(config: &Config) -> ProvisionResult<String> {
    let mut services = IndexMap::new();
    services.insert(GUACD_SERVICE.to_string(), Some(guacd_service()));
    services.insert(DB_SERVICE.to_string(), Some(db_service(config)));
    services.insert(GATEWAY_SERVICE.to_string(), Some(gateway_service(config)));

    let mut volumes = IndexMap::new();
    volumes.insert(DB_VOLUME.to_string(), MapOrEmpty::Map(local_volume()));

    let compose = Compose {
        services: Services(services),
        volumes: TopLevelVolumes(volumes),
        networks: network(),
        ..Default::default()
    };

    Ok(serde_yaml::to_string(&compose)?)
}

fn guacd_service() -> Service {
    Service {
        image: Some(GUACD_IMAGE.to_string()),
        container_name: Some(GUACD_SERVICE.to_string()),
        restart: Some("unless-stopped".to_string()),
        networks: Networks::Simple(vec![NETWORK.to_string()]),
        ..Default::default()
    }
}

fn db_service(config: &Config) -> Service {
    let password = config.db_password.expose();

    Service {
        image: Some(DB_IMAGE.to_string()),
        container_name: Some(DB_SERVICE.to_string()),
        restart: Some("unless-stopped".to_string()),
        environment: Environment::List(vec![
            format!("MYSQL_ROOT_PASSWORD={password}"),
            format!("MYSQL_DATABASE={DB_NAME}"),
            format!("MYSQL_USER={DB_USER}"),
            format!("MYSQL_PASSWORD={password}"),
        ]),
        volumes: vec![
            Volumes::Simple(format!("./{INITDB_DIR}:/docker-entrypoint-initdb.d:ro")),
            Volumes::Simple(format!("{DB_VOLUME}:/var/lib/mysql")),
        ],
        networks: Networks::Simple(vec![NETWORK.to_string()]),
        ..Default::default()
    }
}

fn gateway_service(config: &Config) -> Service {
    Service {
        image: Some(IMAGE_TAG.to_string()),
        container_name: Some(GATEWAY_SERVICE.to_string()),
        restart: Some("unless-stopped".to_string()),
        depends_on: DependsOnOptions::Simple(vec![
            GUACD_SERVICE.to_string(),
            DB_SERVICE.to_string(),
        ]),
        environment: Environment::List(vec![
            format!("GUACD_HOSTNAME={GUACD_SERVICE}"),
            format!("MYSQL_HOSTNAME={DB_SERVICE}"),
            format!("MYSQL_DATABASE={DB_NAME}"),
            format!("MYSQL_USER={DB_USER}"),
            format!("MYSQL_PASSWORD={}", config.db_password.expose()),
        ]),
        ports: Ports::Short(vec![format!(
            "{}:{GATEWAY_INTERNAL_PORT}",
            config.gateway_port
        )]),
        networks: Networks::Simple(vec![NETWORK.to_string()]),
        ..Default::default()
    }
}

fn local_volume() -> ComposeVolume {
    ComposeVolume {
        driver: Some("local".to_string()),
        driver_opts: IndexMap::new(),
        external: None,
        labels: Labels::default(),
        name: None,
    }
}

fn network() -> ComposeNetworks {
    let mut nets = IndexMap::new();
    nets.insert(
        NETWORK.to_string(),
        MapOrEmpty::Map(NetworkSettings {
            driver: Some("bridge".to_string()),
            ..Default::default()
        }),
    );
    ComposeNetworks(nets)
}
