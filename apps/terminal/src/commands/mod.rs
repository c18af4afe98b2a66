//! # Commands Module
//!
//! Everything a front-end can ask the terminal to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── Request parsing and dispatch
//! ├── auth.rs     ◄─── restore_session, login, logout, get_session
//! ├── cart.rs     ◄─── Cart manipulation and payment selection
//! ├── sale.rs     ◄─── checkout, get_summary
//! ├── stock.rs    ◄─── list_stock, stock_categories, open_box, add_stock
//! ├── catalog.rs  ◄─── catalog_search
//! └── config.rs   ◄─── get_config
//! ```
//!
//! ## Wire Format
//! One JSON object per line in, one per line out:
//! ```text
//! → {"command":"add_to_cart","productId":"1"}
//! ← {"status":"ok","data":{"items":[...],"total":3500,...}}
//!
//! → {"command":"checkout"}
//! ← {"status":"error","error":{"code":"EMPTY_CART","message":"Cart is empty"}}
//! ```
//!
//! Each handler takes only the state it needs, the same way it would be
//! injected by an IPC framework.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod sale;
pub mod stock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use warung_core::PaymentMethod;

use crate::error::ApiError;
use crate::state::AppState;

/// A parsed command line.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "command",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Request {
    RestoreSession,
    Login {
        email: String,
        password: String,
    },
    Logout,
    GetSession,
    GetCart,
    AddToCart {
        product_id: String,
    },
    UpdateCartItem {
        product_id: String,
        quantity: i64,
    },
    ClearCart,
    SetPaymentMethod {
        method: PaymentMethod,
    },
    SetCashTendered {
        amount: String,
    },
    Checkout,
    GetSummary,
    ListStock {
        #[serde(default)]
        query: String,
        #[serde(default)]
        category: Option<String>,
    },
    StockCategories,
    OpenBox {
        product_id: String,
    },
    AddStock {
        product_id: String,
        quantity: i64,
    },
    CatalogSearch {
        #[serde(default)]
        query: String,
    },
    GetConfig,
}

impl Request {
    /// Command name as it appears on the wire. Safe to log; arguments are not.
    pub fn name(&self) -> &'static str {
        match self {
            Request::RestoreSession => "restore_session",
            Request::Login { .. } => "login",
            Request::Logout => "logout",
            Request::GetSession => "get_session",
            Request::GetCart => "get_cart",
            Request::AddToCart { .. } => "add_to_cart",
            Request::UpdateCartItem { .. } => "update_cart_item",
            Request::ClearCart => "clear_cart",
            Request::SetPaymentMethod { .. } => "set_payment_method",
            Request::SetCashTendered { .. } => "set_cash_tendered",
            Request::Checkout => "checkout",
            Request::GetSummary => "get_summary",
            Request::ListStock { .. } => "list_stock",
            Request::StockCategories => "stock_categories",
            Request::OpenBox { .. } => "open_box",
            Request::AddStock { .. } => "add_stock",
            Request::CatalogSearch { .. } => "catalog_search",
            Request::GetConfig => "get_config",
        }
    }
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok { data: Value },
    Error { error: ApiError },
}

impl From<Result<Value, ApiError>> for Response {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Response::Ok { data },
            Err(error) => Response::Error { error },
        }
    }
}

/// Parses and runs one command line.
pub async fn handle_line(app: &AppState, line: &str) -> Response {
    let request = match serde_json::from_str::<Request>(line) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Unparseable command line");
            return Response::Error {
                error: ApiError::bad_request(format!("Invalid command: {}", e)),
            };
        }
    };

    dispatch(app, request).await.into()
}

/// Runs a parsed command against the application state.
pub async fn dispatch(app: &AppState, request: Request) -> Result<Value, ApiError> {
    debug!(command = request.name(), "Dispatching command");

    match request {
        Request::RestoreSession => to_data(auth::restore_session(&app.db, &app.session).await?),
        Request::Login { email, password } => {
            to_data(auth::login(&app.db, &app.session, email, password).await?)
        }
        Request::Logout => to_data(auth::logout(&app.db, &app.session).await?),
        Request::GetSession => to_data(auth::get_session(&app.session)),

        Request::GetCart => to_data(cart::get_cart(&app.session, &app.config)?),
        Request::AddToCart { product_id } => to_data(cart::add_to_cart(
            &app.catalog,
            &app.session,
            &app.config,
            product_id,
        )?),
        Request::UpdateCartItem {
            product_id,
            quantity,
        } => to_data(cart::update_cart_item(
            &app.session,
            &app.config,
            product_id,
            quantity,
        )?),
        Request::ClearCart => to_data(cart::clear_cart(&app.session, &app.config)?),
        Request::SetPaymentMethod { method } => {
            to_data(cart::set_payment_method(&app.session, &app.config, method)?)
        }
        Request::SetCashTendered { amount } => {
            to_data(cart::set_cash_tendered(&app.session, &app.config, amount)?)
        }

        Request::Checkout => to_data(sale::checkout(&app.session, &app.summary, &app.config)?),
        Request::GetSummary => {
            to_data(sale::get_summary(&app.session, &app.summary, &app.config)?)
        }

        Request::ListStock { query, category } => {
            to_data(stock::list_stock(&app.session, query, category)?)
        }
        Request::StockCategories => to_data(stock::stock_categories(&app.session)?),
        Request::OpenBox { product_id } => to_data(stock::open_box(&app.session, product_id)?),
        Request::AddStock {
            product_id,
            quantity,
        } => to_data(stock::add_stock(&app.session, product_id, quantity)?),

        Request::CatalogSearch { query } => to_data(catalog::catalog_search(
            &app.catalog,
            &app.session,
            &app.config,
            query,
        )?),
        Request::GetConfig => to_data(config::get_config(&app.config)),
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}
