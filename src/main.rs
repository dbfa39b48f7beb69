//! Larder CLI

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use larder::{
    admission,
    catalog::{Catalog, RestaurantFilter, listing},
    cart::LineKey,
    checkout::{self, Customer, DeliveryDetails, Quote, receipt},
    config::{CheckoutConfig, LoggingConfig, StoreConfig},
    menu::{MenuItemId, RestaurantId},
    observability,
    orders::OrderStatus,
    storage::FileStorage,
    store::CartStore,
};

#[derive(Debug, Parser)]
#[command(name = "larder", about = "Food order cart", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    checkout: CheckoutConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List restaurants, optionally searched or filtered by cuisine
    Restaurants(RestaurantsArgs),

    /// Show a restaurant's menu grouped by category
    Menu(MenuArgs),

    /// Add a menu item to the cart
    Add(AddArgs),

    /// Remove a menu item from the cart
    Remove(RemoveArgs),

    /// Set the quantity of a menu item; zero removes it
    Set(SetArgs),

    /// Empty the cart
    Clear,

    /// Show the cart with its checkout totals
    Show,

    /// Print the order request for the current cart
    Checkout(CheckoutArgs),

    /// Show the tracker steps for an order status
    Track(TrackArgs),
}

#[derive(Debug, Args)]
struct RestaurantsArgs {
    /// Text to look for in restaurant names, cuisines, and descriptions
    #[arg(short, long)]
    search: Option<String>,

    /// Only list restaurants serving this cuisine
    #[arg(short, long)]
    cuisine: Option<String>,

    /// Menu catalog (YAML)
    #[arg(long, env = "LARDER_CATALOG")]
    catalog: PathBuf,
}

#[derive(Debug, Args)]
struct MenuArgs {
    /// Restaurant identifier
    restaurant_id: String,

    /// Menu catalog (YAML)
    #[arg(long, env = "LARDER_CATALOG")]
    catalog: PathBuf,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Menu item identifier
    item_id: String,

    /// Number to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// Special instructions for this item
    #[arg(short, long)]
    note: Option<String>,

    /// Menu catalog (YAML)
    #[arg(long, env = "LARDER_CATALOG")]
    catalog: PathBuf,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Menu item identifier
    item_id: String,

    /// Only remove the line with these instructions
    #[arg(short, long)]
    note: Option<String>,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Menu item identifier
    item_id: String,

    /// New quantity
    quantity: u32,

    /// Only change the line with these instructions
    #[arg(short, long)]
    note: Option<String>,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Menu catalog (YAML), used to show the restaurant name
    #[arg(long, env = "LARDER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Customer identifier
    #[arg(long, env = "LARDER_CUSTOMER_ID")]
    customer_id: String,

    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer email
    #[arg(long)]
    email: String,

    /// Phone number for delivery updates
    #[arg(long)]
    phone: Option<String>,

    /// Notes for the restaurant or rider
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Debug, Args)]
struct TrackArgs {
    /// Order status as reported by the order service
    status: String,
}

type Store = CartStore<FileStorage>;

fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(clippy::print_stderr, reason = "command errors are reported on stderr")]
            {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    observability::init(&cli.logging).map_err(|error| error.to_string())?;

    match &cli.command {
        Commands::Restaurants(args) => restaurants(&cli.checkout, args),
        Commands::Menu(args) => menu(&cli.checkout, args),
        Commands::Track(args) => track(args),
        command => edit_cart(cli, command),
    }
}

fn edit_cart(cli: &Cli, command: &Commands) -> Result<(), String> {
    let mut store = Store::open_with_key(cli.store.storage(), cli.store.storage_key.clone());

    match command {
        Commands::Add(args) => add(&mut store, args)?,
        Commands::Remove(args) => remove(&mut store, args),
        Commands::Set(args) => set(&mut store, args),
        Commands::Clear => store.clear_cart(),
        Commands::Checkout(args) => return print_order(&store, &cli.checkout, args),
        Commands::Show | Commands::Restaurants(_) | Commands::Menu(_) | Commands::Track(_) => {}
    }

    show(&store, &cli.checkout)
}

fn restaurants(config: &CheckoutConfig, args: &RestaurantsArgs) -> Result<(), String> {
    let catalog = Catalog::from_path(&args.catalog).map_err(|error| error.to_string())?;

    let filter = RestaurantFilter {
        search: args.search.clone(),
        cuisine: args.cuisine.clone(),
    };

    listing::write_restaurants(
        io::stdout().lock(),
        &catalog.find_restaurants(&filter),
        config.currency,
    )
    .map_err(|error| error.to_string())
}

fn menu(config: &CheckoutConfig, args: &MenuArgs) -> Result<(), String> {
    let catalog = Catalog::from_path(&args.catalog).map_err(|error| error.to_string())?;
    let id = RestaurantId::new(args.restaurant_id.as_str());

    let restaurant = catalog.restaurant(&id).map_err(|error| error.to_string())?;
    let sections = catalog.menu_sections(&id).map_err(|error| error.to_string())?;

    listing::write_menu(io::stdout().lock(), restaurant, &sections, config.currency)
        .map_err(|error| error.to_string())
}

fn add(store: &mut Store, args: &AddArgs) -> Result<(), String> {
    let catalog = Catalog::from_path(&args.catalog).map_err(|error| error.to_string())?;
    let item = catalog
        .item(&MenuItemId::new(args.item_id.as_str()))
        .map_err(|error| error.to_string())?;

    admission::admit(store.cart(), item).map_err(|error| error.to_string())?;

    store
        .add_item(item.clone(), args.quantity, args.note.as_deref())
        .map_err(|error| error.to_string())
}

fn remove(store: &mut Store, args: &RemoveArgs) {
    match &args.note {
        Some(note) => {
            store.remove_line(&LineKey::new(args.item_id.as_str(), Some(note.as_str())));
        }
        None => store.remove_item(&MenuItemId::new(args.item_id.as_str())),
    }
}

fn set(store: &mut Store, args: &SetArgs) {
    match &args.note {
        Some(note) => store.set_line_quantity(
            &LineKey::new(args.item_id.as_str(), Some(note.as_str())),
            args.quantity,
        ),
        None => store.update_quantity(&MenuItemId::new(args.item_id.as_str()), args.quantity),
    }
}

fn show(store: &Store, config: &CheckoutConfig) -> Result<(), String> {
    let quote = Quote::for_cart(store.cart(), &config.pricing())
        .map_err(|error| error.to_string())?
        .rounded();

    receipt::write_cart_summary(io::stdout().lock(), store.cart(), &quote, config.currency)
        .map_err(|error| error.to_string())
}

fn print_order(store: &Store, config: &CheckoutConfig, args: &CheckoutArgs) -> Result<(), String> {
    let customer = Customer {
        id: args.customer_id.clone(),
        name: args.name.clone(),
        email: args.email.clone(),
    };

    let details = DeliveryDetails {
        address: args.address.clone(),
        phone: args.phone.clone(),
        notes: args.notes.clone(),
    };

    let request = checkout::package_order(store.cart(), &customer, &details, &config.pricing())
        .map_err(|error| error.to_string())?;

    let mut out = io::stdout().lock();

    if let Some(path) = &args.catalog {
        let catalog = Catalog::from_path(path).map_err(|error| error.to_string())?;
        let restaurant = catalog
            .restaurant(&request.restaurant_id)
            .map_err(|error| error.to_string())?;

        writeln!(out, "Ordering from {}", restaurant.name).map_err(|error| error.to_string())?;
    }

    let quote = Quote::for_cart(store.cart(), &config.pricing())
        .map_err(|error| error.to_string())?
        .rounded();

    receipt::write_cart_summary(&mut out, store.cart(), &quote, config.currency)
        .map_err(|error| error.to_string())?;

    let json = serde_json::to_string_pretty(&request).map_err(|error| error.to_string())?;

    writeln!(out, "{json}").map_err(|error| error.to_string())
}

fn track(args: &TrackArgs) -> Result<(), String> {
    let status = args
        .status
        .parse::<OrderStatus>()
        .map_err(|error| error.to_string())?;

    let mut out = io::stdout().lock();

    let Some(steps) = status.progress() else {
        return writeln!(out, "{}", status.label()).map_err(|error| error.to_string());
    };

    for step in steps {
        let mark = match (step.completed, step.current) {
            (_, true) => "▶",
            (true, false) => "✓",
            (false, false) => "·",
        };

        writeln!(out, " {mark} {}", step.status.label()).map_err(|error| error.to_string())?;
    }

    Ok(())
}
