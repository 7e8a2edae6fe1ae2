//! Deployment summary shown once the containers are up.

use std::path::Path;

use crate::domain::style;
use crate::domain::{CommandRunner, CommandSpec, ConfigRecord};

const DEFAULT_ADMIN_EMAIL: &str = "admin@store.com";
const DEFAULT_ADMIN_PASSWORD: &str = "changeme123";

/// Everything the summary needs, resolved up front.
pub struct Summary<'a> {
    pub address: String,
    pub port: u16,
    pub project_dir: &'a Path,
    pub env_path: &'a Path,
    pub record: &'a ConfigRecord,
}

/// First address reported by `hostname -I`, or `localhost`.
pub fn local_address<R: CommandRunner>(runner: &R) -> String {
    runner
        .run(&CommandSpec::new("hostname", ["-I"]).captured())
        .ok()
        .and_then(|out| out.stdout.split_whitespace().next().map(str::to_string))
        .unwrap_or_else(|| "localhost".to_string())
}

impl Summary<'_> {
    /// Render the summary text.
    pub fn render(&self) -> String {
        let store_name = self.record.get("VITE_STORE_NAME").unwrap_or("ListPull");
        let dir = self.project_dir.display();
        let ip = &self.address;

        let banner = format!(
            "╔═══════════════════════════════════════════════════════════════╗\n\
             ║            {:^43}            ║\n\
             ║                  Deployed Successfully!                       ║\n\
             ╚═══════════════════════════════════════════════════════════════╝",
            store_name
        );

        format!(
            r#"
{banner}

{url_heading}
    http://{ip}:{port}

{login_heading}
    Email: {email}
    Password: {password}

    IMPORTANT: Change the password after first login!

    To change the admin password or add users, you can:
    - Use the admin panel
    - Or run: cd {dir}/server && npm run seed

{commands_heading}
    cd {dir}
    docker compose logs -f          # View logs
    docker compose restart          # Restart
    docker compose down             # Stop
    docker compose up -d --build    # Rebuild after config changes

{config_heading}
    {env_path}
    (Rebuild required after changes)

{database_heading}
    Docker volume: listpull-data
    Inside container: /app/data/listpull.db

{production_heading}
    1. Point a domain to {ip}
    2. Install nginx: apt install nginx
    3. Copy deploy/nginx.conf to /etc/nginx/sites-available/
    4. Set up SSL: apt install certbot python3-certbot-nginx
                   certbot --nginx -d yourdomain.com
"#,
            banner = style::highlight(&banner),
            url_heading = style::bold("Application URL:"),
            port = self.port,
            login_heading = style::bold("Default Admin Login:"),
            email = DEFAULT_ADMIN_EMAIL,
            password = DEFAULT_ADMIN_PASSWORD,
            commands_heading = style::bold("Useful Commands:"),
            config_heading = style::bold("Configuration File:"),
            env_path = self.env_path.display(),
            database_heading = style::bold("Database Location:"),
            production_heading = style::bold("Production Setup (recommended):"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::testing::ScriptedRunner;
    use std::path::PathBuf;

    #[test]
    fn test_local_address_takes_first_token() {
        let runner = ScriptedRunner::new().respond("hostname -I", true, "10.0.0.5 172.17.0.1 \n");
        assert_eq!(local_address(&runner), "10.0.0.5");
    }

    #[test]
    fn test_local_address_falls_back() {
        let failing = ScriptedRunner::new().respond("hostname -I", false, "");
        assert_eq!(local_address(&failing), "localhost");

        let empty = ScriptedRunner::new().respond("hostname -I", true, "\n");
        assert_eq!(local_address(&empty), "localhost");
    }

    #[test]
    fn test_render_contents() {
        let mut record = ConfigRecord::new();
        record.insert("VITE_STORE_NAME", "Card Shop");
        let project = PathBuf::from("/opt/listpull");
        let env_path = project.join(".env");

        let text = Summary {
            address: "192.168.1.20".to_string(),
            port: 3000,
            project_dir: &project,
            env_path: &env_path,
            record: &record,
        }
        .render();

        assert!(text.contains("http://192.168.1.20:3000"));
        assert!(text.contains(&format!("║            {:^43}            ║", "Card Shop")));
        assert!(text.contains("Email: admin@store.com"));
        assert!(text.contains("Password: changeme123"));
        assert!(text.contains("cd /opt/listpull\n"));
        assert!(text.contains("/opt/listpull/.env"));
        assert!(text.contains("Point a domain to 192.168.1.20"));
        assert!(text.contains("certbot --nginx"));
    }

    #[test]
    fn test_render_defaults_store_name() {
        let record = ConfigRecord::new();
        let project = PathBuf::from("/srv/app");
        let env_path = project.join(".env");
        let text = Summary {
            address: "localhost".to_string(),
            port: 8080,
            project_dir: &project,
            env_path: &env_path,
            record: &record,
        }
        .render();

        assert!(text.contains("ListPull"));
        assert!(text.contains("http://localhost:8080"));
    }
}
