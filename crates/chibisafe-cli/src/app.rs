//! Application state for the chibisafe terminal client.
//!
//! `App` owns the configuration, the saved login state and the
//! `SessionClient` built from it, and runs one command per invocation.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};

use chibisafe_core::models::{AssetSelection, LoginResponse};
use chibisafe_core::utils::{
    base64_to_blob, content_type_for_path, format_size, truncate_string, DEFAULT_CHUNK_SIZE,
};
use chibisafe_core::{ApiError, Blob, Config, LoginState, LoginStore, SessionClient};

use crate::forms;
use crate::Command;

// ============================================================================
// Constants
// ============================================================================

/// Width of the name column in file listings.
const NAME_COLUMN_WIDTH: usize = 32;

const NOT_LOGGED_IN: &str = "Not logged in. Run `chibisafe login` first.";

pub struct App {
    config: Config,
    store: LoginStore,
    state: Option<LoginState>,
    client: SessionClient,
    server_override: Option<String>,
}

impl App {
    /// Build the app from the state saved in the configured data directory.
    pub fn new(config: Config, server_override: Option<String>) -> Result<Self> {
        let store = LoginStore::new(config.data_dir()?);
        Self::with_store(config, store, server_override)
    }

    /// Build the app from whatever `store` holds; without state the client
    /// is empty.
    pub fn with_store(
        config: Config,
        store: LoginStore,
        server_override: Option<String>,
    ) -> Result<Self> {
        let state = match store.load() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable login state");
                None
            }
        };

        let client = match state {
            Some(ref state) => state.to_client(config.request_timeout())?,
            None => Self::empty_client(&config)?,
        };

        Ok(Self {
            config,
            store,
            state,
            client,
            server_override,
        })
    }

    fn empty_client(config: &Config) -> Result<SessionClient> {
        SessionClient::with_timeout("", "", config.request_timeout())
            .context("Failed to build HTTP client")
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { username } => self.login(username).await,
            Command::Logout => self.logout(),
            Command::Status => self.status().await,
            Command::Whoami => self.whoami().await,
            Command::Passwd => self.change_password().await,
            Command::Files { all, page, limit } => self.files(all, page, limit).await,
            Command::Albums => self.albums().await,
            Command::Upload {
                path,
                base64,
                content_type,
            } => self.upload(&path, base64, content_type).await,
        }
    }

    fn require_login(&self) -> Result<&LoginState> {
        self.state.as_ref().ok_or_else(|| anyhow!(NOT_LOGGED_IN))
    }

    /// A rejected token means the saved state is useless; drop it.
    fn handle_api_error(&mut self, error: ApiError) -> anyhow::Error {
        if error.is_auth_failure() {
            if let Err(e) = self.logout_quietly() {
                warn!(error = %e, "Failed to clear login state");
            }
            anyhow!("{} You have been logged out.", error)
        } else {
            anyhow!(error)
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    async fn login(&mut self, username: Option<String>) -> Result<()> {
        let server = match self
            .server_override
            .clone()
            .or_else(|| self.state.as_ref().map(|s| s.server.clone()))
            .or_else(|| self.config.server())
        {
            Some(server) => server,
            None => prompt_line("Server (e.g. https://chibisafe.moe): ")?,
        };

        if !forms::is_valid_server_url(&server) {
            bail!("Invalid server.");
        }
        let server = forms::normalize_server(&server);

        println!("Checking {}...", server);
        if !self.client.validate(&server).await {
            bail!("Invalid server.");
        }

        let username = match username {
            Some(username) => username,
            None => match self.config.last_username.clone() {
                Some(last) => {
                    let input = prompt_line(&format!("Username [{}]: ", last))?;
                    if input.is_empty() {
                        last
                    } else {
                        input
                    }
                }
                None => prompt_line("Username: ")?,
            },
        };

        let password = match self.stored_password(&server, &username) {
            Some(stored) if confirm("Use stored password? [Y/n]: ")? => stored,
            _ => rpassword::prompt_password("Password: ")?,
        };

        forms::check_credentials(&username, &password).map_err(|e| anyhow!(e))?;

        let response = self.sign_in(&server, &username, &password).await?;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        println!(
            "Logged in as {} ({})",
            response.user.username,
            response.user.role_display()
        );
        Ok(())
    }

    /// Log in against `server` and persist the new session.
    async fn sign_in(
        &mut self,
        server: &str,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse> {
        let response = self.client.login(server, username, password).await?;

        let state = LoginState::new(
            server,
            response.token.clone(),
            username,
            Some(password.to_string()),
        );
        self.store.save(&state)?;
        self.state = Some(state);

        self.config.last_username = Some(username.to_string());
        self.config.default_server = Some(server.to_string());

        info!("Login successful");
        Ok(response)
    }

    fn stored_password(&self, server: &str, username: &str) -> Option<String> {
        self.state
            .as_ref()
            .filter(|s| s.server == server && s.username == username)
            .and_then(|s| s.password.clone())
    }

    fn logout(&mut self) -> Result<()> {
        self.logout_quietly()?;
        println!("Logged out.");
        Ok(())
    }

    /// Forget the saved state and replace the client with an empty one.
    fn logout_quietly(&mut self) -> Result<()> {
        self.store.clear()?;
        self.state = None;
        self.client = Self::empty_client(&self.config)?;
        info!("Logged out");
        Ok(())
    }

    async fn status(&self) -> Result<()> {
        let Some(state) = self.state.as_ref() else {
            println!("Not logged in.");
            return Ok(());
        };
        println!("Server:  {}", state.server);
        println!("User:    {}", state.username);

        if !self.client.check_valid().await {
            println!("Session: expired (run `chibisafe login`)");
            return Ok(());
        }
        println!("Session: valid");

        let (profile, albums) = futures::join!(
            self.client.get_user_profile(),
            self.client.list_albums()
        );
        if let Ok(profile) = profile {
            println!("Role:    {}", profile.user.role_display());
        }
        match albums {
            Ok(albums) => println!("Albums:  {}", albums.albums.len()),
            Err(e) => warn!(error = %e, "Failed to fetch albums"),
        }
        Ok(())
    }

    async fn whoami(&mut self) -> Result<()> {
        self.require_login()?;
        let profile = match self.client.get_user_profile().await {
            Ok(profile) => profile,
            Err(e) => return Err(self.handle_api_error(e)),
        };

        let user = profile.user;
        println!("Username: {}", user.username);
        println!("ID:       {}", user.id);
        println!("Role:     {}", user.role_display());
        println!(
            "API key:  {}",
            if user.api_key.is_some() { "set" } else { "not set" }
        );
        Ok(())
    }

    async fn change_password(&mut self) -> Result<()> {
        self.require_login()?;

        let old = rpassword::prompt_password("Current password: ")?;
        let new = rpassword::prompt_password("New password: ")?;
        let confirm = rpassword::prompt_password("Confirm new password: ")?;
        forms::check_password_change(&old, &new, &confirm).map_err(|e| anyhow!(e))?;

        let response = self.client.change_password(&old, &new).await?;
        println!("{}", response.message);

        // The old token is no longer trusted once the password changes.
        self.logout()
    }

    // =========================================================================
    // Gallery
    // =========================================================================

    async fn files(&mut self, all: bool, page: u32, limit: Option<u32>) -> Result<()> {
        self.require_login()?;
        let limit = limit.unwrap_or_else(|| self.config.page_size());
        let page = page.max(1);

        let result = if all {
            self.client.list_files(true, None, None).await
        } else {
            self.client.list_files(false, Some(limit), Some(page)).await
        };
        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(self.handle_api_error(e)),
        };

        if response.files.is_empty() {
            println!("No uploads.");
        }
        for file in &response.files {
            println!(
                "{:>6}  {:<width$}  {:>9}  {:<12}  {}",
                file.id,
                truncate_string(file.display_name(), NAME_COLUMN_WIDTH),
                format_size(file.size),
                file.created_at.as_ref().map(|t| t.display()).unwrap_or_default(),
                file.url,
                width = NAME_COLUMN_WIDTH,
            );
        }

        if !all {
            println!("Page {} of {}", page, response.total_pages(limit));
        }
        Ok(())
    }

    async fn albums(&mut self) -> Result<()> {
        self.require_login()?;
        let response = match self.client.list_albums().await {
            Ok(response) => response,
            Err(e) => return Err(self.handle_api_error(e)),
        };

        if response.albums.is_empty() {
            println!("No albums.");
        }
        for album in &response.albums {
            println!(
                "{:>6}  {:<width$}  {:>10}{}",
                album.id,
                truncate_string(&album.name, NAME_COLUMN_WIDTH),
                album.display_file_count(),
                if album.nsfw { "  [nsfw]" } else { "" },
                width = NAME_COLUMN_WIDTH,
            );
        }
        Ok(())
    }

    // =========================================================================
    // Upload
    // =========================================================================

    async fn upload(
        &mut self,
        path: &Path,
        base64: bool,
        content_type: Option<String>,
    ) -> Result<()> {
        self.require_login()?;

        let content_type =
            content_type.unwrap_or_else(|| content_type_for_path(path).to_string());
        let blob = read_blob(path, base64, &content_type)?;
        let selection = AssetSelection::Picked {
            uri: format!("file://{}", path.display()),
        };

        println!("Uploading {} ({})...", path.display(), format_size(blob.len() as u64));
        let response = match self.client.upload_file(&selection, blob).await {
            Ok(response) => response,
            Err(e) => return Err(self.handle_api_error(e)),
        };

        match response.url() {
            Some(url) => println!("{}\n{}", response.message, url),
            None => println!("{}", response.message),
        }
        Ok(())
    }
}

/// Read an upload payload, decoding it first when the file holds base64.
fn read_blob(path: &Path, base64: bool, content_type: &str) -> Result<Blob> {
    if base64 {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        base64_to_blob(&text, content_type, DEFAULT_CHUNK_SIZE)
            .with_context(|| format!("{} is not valid base64", path.display()))
    } else {
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Blob::new(data, content_type))
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(prompt_line(prompt)?.to_lowercase() != "n")
}
