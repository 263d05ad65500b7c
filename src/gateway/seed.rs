use std::fmt::Write;

use crate::config::{Config, DEFAULT_ADMIN_USER, SSH_PORT};

/// Name of the preconfigured SSH connection.
pub const CONNECTION_NAME: &str = "Local SSH";

/// Render the MySQL seed: one admin account and one SSH
/// connection to the host's own sshd.
///
/// The password hash is computed by MySQL at load time from a
/// random salt, matching Guacamole's JDBC auth scheme.
#[must_use]
pub fn render(config: &Config) -> String {
    let admin = quote(&config.admin_user);
    let password = quote(config.admin_password.expose());
    let connection = quote(CONNECTION_NAME);

    let mut sql = String::new();

    sql.push_str("-- Administrator account\n");
    sql.push_str("SET @salt = UNHEX(SHA2(UUID(), 256));\n\n");
    let _ = writeln!(
        sql,
        "INSERT IGNORE INTO guacamole_entity (name, type) VALUES ({admin}, 'USER');\n"
    );
    let _ = writeln!(
        sql,
        "INSERT INTO guacamole_user (entity_id, password_salt, password_hash, password_date)\n\
         SELECT entity_id, @salt, UNHEX(SHA2(CONCAT({password}, HEX(@salt)), 256)), NOW()\n\
         FROM guacamole_entity WHERE name = {admin} AND type = 'USER'\n\
         ON DUPLICATE KEY UPDATE\n    \
         password_salt = @salt,\n    \
         password_hash = UNHEX(SHA2(CONCAT({password}, HEX(@salt)), 256)),\n    \
         password_date = NOW();\n"
    );
    let _ = writeln!(
        sql,
        "INSERT IGNORE INTO guacamole_system_permission (entity_id, permission)\n\
         SELECT entity_id, permission\n\
         FROM guacamole_entity\n\
         CROSS JOIN (\n    \
         SELECT 'ADMINISTER' AS permission\n    \
         UNION SELECT 'CREATE_CONNECTION'\n    \
         UNION SELECT 'CREATE_CONNECTION_GROUP'\n    \
         UNION SELECT 'CREATE_SHARING_PROFILE'\n    \
         UNION SELECT 'CREATE_USER'\n    \
         UNION SELECT 'CREATE_USER_GROUP'\n\
         ) AS granted\n\
         WHERE name = {admin} AND type = 'USER';\n"
    );

    // The upstream schema creates guacadmin; user rows and
    // permissions cascade from the entity.
    if config.admin_user != DEFAULT_ADMIN_USER {
        sql.push_str("-- Remove the built-in administrator\n");
        let _ = writeln!(
            sql,
            "DELETE FROM guacamole_entity WHERE name = {} AND type = 'USER';\n",
            quote(DEFAULT_ADMIN_USER)
        );
    }

    sql.push_str("-- SSH connection to this host\n");
    let _ = writeln!(
        sql,
        "INSERT INTO guacamole_connection (connection_name, protocol) VALUES ({connection}, 'ssh');\n"
    );

    let parameters = [
        ("hostname", "localhost".to_string()),
        ("port", SSH_PORT.to_string()),
        ("username", config.user.clone()),
    ];
    sql.push_str(
        "INSERT INTO guacamole_connection_parameter (connection_id, parameter_name, parameter_value)\n",
    );
    let selects: Vec<String> = parameters
        .iter()
        .map(|(name, value)| {
            format!(
                "SELECT connection_id, {}, {} FROM guacamole_connection WHERE connection_name = {connection}",
                quote(name),
                quote(value)
            )
        })
        .collect();
    sql.push_str(&selects.join("\nUNION ALL\n"));
    sql.push_str(";\n\n");

    let _ = writeln!(
        sql,
        "INSERT IGNORE INTO guacamole_connection_permission (entity_id, connection_id, permission)\n\
         SELECT e.entity_id, c.connection_id, p.permission\n\
         FROM guacamole_entity e\n\
         JOIN guacamole_connection c ON c.connection_name = {connection}\n\
         CROSS JOIN (\n    \
         SELECT 'READ' AS permission\n    \
         UNION SELECT 'UPDATE'\n    \
         UNION SELECT 'DELETE'\n    \
         UNION SELECT 'ADMINISTER'\n\
         ) AS p\n\
         WHERE e.name = {admin} AND e.type = 'USER';"
    );

    sql
}

/// Quote a string as a MySQL literal.
#[must_use]
pub fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "''");
    format!("'{escaped}'")
}
