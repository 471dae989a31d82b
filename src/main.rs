//! Storefront CLI
//!
//! Browse the catalog and manage the session cart from the terminal. The cart
//! snapshot survives between invocations.

use std::{
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};

use storefront::{
    cart::{CartError, CartStore},
    catalog::{Catalog, CatalogError, ProductFilter, fixture::to_minor_units},
    checkout::{CheckoutError, CustomerDetails, PaymentMethod},
    config::{LoggingConfig, StorefrontConfig},
    observability::{ObservabilityError, init_logging},
    products::{Brand, Category},
    render::{self, RenderError},
    storage::{FileStorage, StorageError},
};

/// Storefront cart
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart", long_about = None)]
struct Cli {
    /// Catalog and cart locations.
    #[command(flatten)]
    storefront: StorefrontConfig,

    /// Logging output settings.
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog products
    Products {
        /// Case-insensitive match on product name
        #[arg(long)]
        search: Option<String>,

        /// Only show this category (repeatable)
        #[arg(long)]
        category: Vec<Category>,

        /// Only show this brand (repeatable)
        #[arg(long)]
        brand: Vec<Brand>,

        /// Lowest unit price, in major units
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest unit price, in major units
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only show featured products
        #[arg(long)]
        featured: bool,

        /// Only show new arrivals
        #[arg(long)]
        new_arrivals: bool,
    },

    /// Show the featured and new arrivals shelves
    Home,

    /// Show a product and related products
    Product {
        /// Product identifier
        product_id: String,
    },

    /// Show the cart
    Show,

    /// Add a product to the cart
    Add {
        /// Product identifier
        product_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Set a product's quantity; zero or below removes it
    Update {
        /// Product identifier
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a product from the cart
    Remove {
        /// Product identifier
        product_id: String,
    },

    /// Empty the cart
    Clear,

    /// Place an order for the cart contents
    Checkout {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// City
        #[arg(long)]
        city: String,

        /// Postal code
        #[arg(long)]
        zip: String,

        /// Payment method (card, mpesa, paypal)
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,

        /// Print the order as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("failed to open cart storage: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("failed to render output: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("price out of range: {0}")]
    PriceOutOfRange(Decimal),
}

/// Related products shown under a product.
const RELATED_LIMIT: usize = 4;

fn price_bound(amount: Option<Decimal>) -> Result<Option<i64>, CliError> {
    amount
        .map(|amount| to_minor_units(amount).ok_or(CliError::PriceOutOfRange(amount)))
        .transpose()
}

fn main() -> ExitCode {
    let cli = Cli::load().unwrap_or_else(|e| e.exit());

    if let Err(e) = init_logging(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{e}");
        }

        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "command failed");

            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let catalog = Arc::new(Catalog::from_path(&cli.storefront.catalog)?);
    let storage = FileStorage::open(&cli.storefront.cart_dir)?;

    let mut store = CartStore::open(catalog, storage);

    store.subscribe(|cart| {
        info!(lines = cart.len(), count = cart.count(), "cart updated");
    });

    let mut out = io::stdout().lock();

    match cli.command {
        Command::Products {
            search,
            category,
            brand,
            min_price,
            max_price,
            featured,
            new_arrivals,
        } => {
            let (min_minor, max_minor) = (price_bound(min_price)?, price_bound(max_price)?);
            let mut filter = ProductFilter::new().with_price_range(min_minor, max_minor);

            if let Some(search) = search {
                filter = filter.with_search(&search);
            }

            for category in category {
                filter = filter.with_category(category);
            }

            for brand in brand {
                filter = filter.with_brand(brand);
            }

            let catalog = store.catalog();

            let products = catalog
                .filter(&filter)
                .filter(|product| !featured || product.featured)
                .filter(|product| !new_arrivals || product.new_arrival)
                .map(Arc::as_ref);

            render::write_products(&mut out, products)?;
            render::write_facets(&mut out, catalog)?;
        }
        Command::Home => {
            let catalog = store.catalog();

            writeln!(out, "Featured").map_err(RenderError::from)?;
            render::write_products(&mut out, catalog.featured().map(Arc::as_ref))?;

            writeln!(out, "New arrivals").map_err(RenderError::from)?;
            render::write_products(&mut out, catalog.new_arrivals().map(Arc::as_ref))?;
        }
        Command::Product { product_id } => {
            let catalog = store.catalog();

            let product = catalog
                .get(&product_id)
                .ok_or_else(|| CliError::UnknownProduct(product_id.clone()))?;

            let related = catalog.related(product, RELATED_LIMIT).map(Arc::as_ref);

            render::write_product(&mut out, product, related)?;
        }
        Command::Show => render::write_cart(&mut out, store.state())?,
        Command::Add {
            product_id,
            quantity,
        } => {
            store.add_by_id(&product_id, quantity)?;
            render::write_cart(&mut out, store.state())?;
        }
        Command::Update {
            product_id,
            quantity,
        } => {
            store.update_quantity(&product_id, quantity)?;
            render::write_cart(&mut out, store.state())?;
        }
        Command::Remove { product_id } => {
            store.remove_from_cart(&product_id)?;
            render::write_cart(&mut out, store.state())?;
        }
        Command::Clear => {
            store.clear_cart()?;
            render::write_cart(&mut out, store.state())?;
        }
        Command::Checkout {
            name,
            email,
            phone,
            address,
            city,
            zip,
            payment,
            json,
        } => {
            let details = CustomerDetails {
                name,
                email,
                phone,
                address,
                city,
                zip,
            };

            let order = store.checkout(details, payment)?;

            if json {
                render::write_order_json(&mut out, &order)?;
            } else {
                render::write_order(&mut out, &order)?;
            }
        }
    }

    out.flush().map_err(RenderError::from)?;

    Ok(())
}
