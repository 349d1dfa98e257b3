//! CLI commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use shop_core::{FileStore, LogNavigator, SessionStore};
use shop_http::types::{Credentials, ProductInput};
use shop_http::{AuthService, ShopClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{self, CliConfig};
use crate::render::{print_json, print_orders, print_products};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        username: String,

        /// Password (prompting is not supported; prefer the environment variable)
        #[arg(long, env = "SHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        username: String,

        #[arg(long, env = "SHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// List or search the catalog
    Products {
        /// Search term
        #[arg(long)]
        search: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },

    /// Your orders
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },

    /// Store administration (admin role required)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Upload a product image
    Upload { file: PathBuf },

    /// Resolve a product image reference to a URL
    ImageUrl { image: String },

    /// Configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show the cart
    Show,

    /// Add a product
    Add {
        product_id: i64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },

    /// Change the quantity of a cart item
    Update { item_id: i64, quantity: u32 },

    /// Remove a cart item
    Remove { item_id: i64 },
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// List your orders
    List,

    /// Show one order
    Show { order_id: i64 },

    /// Create an order from the cart
    Create,

    /// Pay a pending order
    Pay { order_id: i64 },

    /// Cancel an order
    Cancel { order_id: i64 },

    /// Confirm an order was received
    Complete { order_id: i64 },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List all products
    Products,

    /// Create a product
    AddProduct {
        #[command(flatten)]
        product: ProductArgs,
    },

    /// Replace a product
    UpdateProduct {
        product_id: i64,
        #[command(flatten)]
        product: ProductArgs,
    },

    /// Delete a product
    DeleteProduct { product_id: i64 },

    /// List all orders
    Orders,

    /// Mark an order as shipped
    Ship { order_id: i64 },

    /// Delete an order
    DeleteOrder { order_id: i64 },

    /// List all users
    Users,

    /// Delete a user
    DeleteUser { user_id: i64 },
}

#[derive(clap::Args)]
pub struct ProductArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    stock: u32,
    /// Image file name or URL
    #[arg(long)]
    image: Option<String>,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            price: args.price,
            stock: args.stock,
            img_url: args.image,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Output file path (defaults to <data_dir>/config.json)
        output: Option<PathBuf>,
    },
}

/// Session and client wired together for one invocation
struct App {
    auth: AuthService,
}

impl App {
    fn open(config: &CliConfig, data_dir: &Path) -> Result<Self> {
        let session_path = config.session_path(data_dir);
        let storage = FileStore::open(&session_path)
            .with_context(|| format!("Failed to open session file {}", session_path.display()))?;
        let session = Arc::new(SessionStore::initialize(
            Arc::new(storage),
            Arc::new(LogNavigator),
        ));
        debug!(?session, "Loaded session");

        let client = ShopClient::builder()
            .base_url(&config.base_url)
            .session(session.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            auth: AuthService::new(client, session),
        })
    }

    fn client(&self) -> &ShopClient {
        self.auth.client()
    }

    fn session(&self) -> &SessionStore {
        self.auth.session()
    }

    fn require_login(&self) -> Result<()> {
        if !self.session().is_logged_in() {
            bail!("Not logged in; run `shop login <username>` first");
        }
        Ok(())
    }

    fn require_admin(&self) -> Result<()> {
        self.require_login()?;
        if !self.session().is_admin() {
            bail!("This command requires the ADMIN role");
        }
        Ok(())
    }
}

impl Commands {
    pub async fn execute(self, config: &CliConfig, data_dir: &Path) -> Result<()> {
        match self {
            // Must work while the configured base URL is still broken
            Self::Config { command } => command.execute(data_dir),
            command => {
                let app = App::open(config, data_dir)?;
                command.run(&app, data_dir).await
            }
        }
    }

    async fn run(self, app: &App, data_dir: &Path) -> Result<()> {
        match self {
            Self::Login { username, password } => {
                let session = app
                    .auth
                    .sign_in(&Credentials::new(username, password))
                    .await?;
                println!(
                    "Logged in as {} ({})",
                    session.username().unwrap_or_default(),
                    session.role().map_or("?", |role| role.as_str())
                );
            }
            Self::Register { username, password } => {
                app.auth
                    .sign_up(&Credentials::new(username.clone(), password))
                    .await?;
                println!("Registered {username}; you can now log in");
            }
            Self::Logout => {
                app.auth.sign_out();
                println!("Logged out");
            }
            Self::Whoami => whoami(app.session()),
            Self::Products { search, json } => {
                let products = match search {
                    Some(query) => app.client().search_products(&query).await?,
                    None => app.client().list_products().await?,
                };
                if json {
                    print_json(&products);
                } else {
                    print_products(app.client(), &products);
                }
            }
            Self::Cart { command } => {
                app.require_login()?;
                command.execute(app.client()).await?;
            }
            Self::Orders { command } => {
                app.require_login()?;
                command.execute(app.client()).await?;
            }
            Self::Admin { command } => {
                app.require_admin()?;
                command.execute(app.client()).await?;
            }
            Self::Upload { file } => {
                app.require_login()?;
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
                let response = app.client().upload_image(file_name, bytes).await?;
                let uploaded = crate::render::unwrap_data(&response).as_str();
                match app.client().image_url(uploaded) {
                    Some(url) => println!("Uploaded: {url}"),
                    None => print_json(&response),
                }
            }
            Self::ImageUrl { image } => match app.client().image_url(Some(&image)) {
                Some(url) => println!("{url}"),
                None => bail!("Image reference is empty"),
            },
            Self::Config { command } => command.execute(data_dir)?,
        }

        Ok(())
    }
}

fn whoami(session: &SessionStore) {
    let snapshot = session.snapshot();
    match snapshot.username() {
        Some(username) if snapshot.is_logged_in() => {
            let role = snapshot.role().map_or("unknown role", |role| role.as_str());
            let root = if snapshot.is_root() { ", root" } else { "" };
            println!("{username} ({role}{root})");
        }
        _ if snapshot.is_logged_in() => println!("Logged in"),
        _ => println!("Not logged in"),
    }
}

impl CartCommands {
    pub async fn execute(self, client: &ShopClient) -> Result<()> {
        match self {
            Self::Show => print_json(&client.get_cart().await?),
            Self::Add {
                product_id,
                quantity,
            } => {
                client.add_to_cart(product_id, quantity).await?;
                println!("Added {quantity} x product #{product_id} to the cart");
            }
            Self::Update { item_id, quantity } => {
                client.update_cart_item(item_id, quantity).await?;
                println!("Cart item #{item_id} now has quantity {quantity}");
            }
            Self::Remove { item_id } => {
                client.remove_cart_item(item_id).await?;
                println!("Removed cart item #{item_id}");
            }
        }
        Ok(())
    }
}

impl OrderCommands {
    pub async fn execute(self, client: &ShopClient) -> Result<()> {
        match self {
            Self::List => print_orders(&client.list_orders().await?),
            Self::Show { order_id } => print_orders(&client.get_order(order_id).await?),
            Self::Create => {
                let order = client.create_order().await?;
                println!("Order created");
                print_orders(&order);
            }
            Self::Pay { order_id } => {
                client.pay_order(order_id).await?;
                println!("Order #{order_id} paid");
            }
            Self::Cancel { order_id } => {
                client.cancel_order(order_id).await?;
                println!("Order #{order_id} cancelled");
            }
            Self::Complete { order_id } => {
                client.complete_order(order_id).await?;
                println!("Order #{order_id} completed");
            }
        }
        Ok(())
    }
}

impl AdminCommands {
    pub async fn execute(self, client: &ShopClient) -> Result<()> {
        match self {
            Self::Products => print_products(client, &client.admin_list_products().await?),
            Self::AddProduct { product } => {
                let created = client.admin_create_product(&product.into()).await?;
                println!("Product created");
                print_json(&created);
            }
            Self::UpdateProduct {
                product_id,
                product,
            } => {
                client
                    .admin_update_product(product_id, &product.into())
                    .await?;
                println!("Product #{product_id} updated");
            }
            Self::DeleteProduct { product_id } => {
                client.admin_delete_product(product_id).await?;
                println!("Product #{product_id} deleted");
            }
            Self::Orders => print_orders(&client.admin_list_orders().await?),
            Self::Ship { order_id } => {
                client.admin_ship_order(order_id).await?;
                println!("Order #{order_id} shipped");
            }
            Self::DeleteOrder { order_id } => {
                client.admin_delete_order(order_id).await?;
                println!("Order #{order_id} deleted");
            }
            Self::Users => print_json(&client.admin_list_users().await?),
            Self::DeleteUser { user_id } => {
                client.admin_delete_user(user_id).await?;
                println!("User #{user_id} deleted");
            }
        }
        Ok(())
    }
}

impl ConfigCommands {
    pub fn execute(self, data_dir: &Path) -> Result<()> {
        match self {
            Self::Init { output } => {
                let config_path = output.unwrap_or_else(|| data_dir.join(config::CONFIG_FILE));

                // Create parent directory if it doesn't exist
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                config::generate_default_config(&config_path)?;
                info!(path = %config_path.display(), "Wrote default configuration");
                println!(
                    "Generated configuration at: {}",
                    config_path.display()
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn config_init_works_with_a_broken_base_url() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig {
            base_url: "not a url".to_string(),
            ..CliConfig::default()
        };
        let output = dir.path().join("nested").join(config::CONFIG_FILE);

        Commands::Config {
            command: ConfigCommands::Init {
                output: Some(output.clone()),
            },
        }
        .execute(&config, dir.path())
        .await
        .unwrap();

        let written = CliConfig::load(&dir.path().join("nested")).unwrap();
        assert_eq!(written, CliConfig::default());
    }

    #[tokio::test]
    async fn other_commands_reject_a_broken_base_url() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig {
            base_url: "not a url".to_string(),
            ..CliConfig::default()
        };

        let err = Commands::Whoami
            .execute(&config, dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }
}
