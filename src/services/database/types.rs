use sqlx::mysql::MySqlConnectOptions;

/// Parameters for one MySQL/MariaDB connection
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionConfig {
    /// Create connection options for sqlx
    pub fn to_mysql_connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    /// `user@host:port/database`, never including the password
    pub fn describe(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

impl Drop for ConnectionConfig {
    fn drop(&mut self) {
        // Zero out password memory when dropped
        let mut bytes = std::mem::take(&mut self.password).into_bytes();
        for byte in bytes.iter_mut() {
            unsafe { std::ptr::write_volatile(byte, 0) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_leaves_out_the_password() {
        let config = ConnectionConfig {
            host: "db".to_string(),
            port: 3306,
            database: "smiledb".to_string(),
            user: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(config.describe(), "alice@db:3306/smiledb");
        assert!(!config.describe().contains("hunter2"));
    }
}
