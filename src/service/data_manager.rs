use std::{
    env, fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver},
        Arc, Mutex,
    },
    thread,
};

use once_cell::sync::OnceCell;

use crate::model::{
    booster::{Booster, BoosterProfile},
    ids::BoosterId,
    order::{Order, OrderIntent},
    pricing::{BulkPricingConfig, PriceTable},
    user::Profile,
};

use super::{
    api::{
        client::{ApiClient, ApiRequest, ClientInitError, RequestError},
        parsing::{
            account::parse_profile,
            booster::{parse_booster_profile, parse_boosters},
            order::{parse_order, parse_orders},
            pricing::{parse_bulk_config, parse_price_table},
            ParsingError,
        },
    },
    session::Session,
};

const EMAIL_VAR: &str = "RIFTBOOST_EMAIL";
const PASSWORD_VAR: &str = "RIFTBOOST_PASSWORD";

pub struct DataManager {
    client: Arc<ApiClient>,
    session: Arc<Session>,
    session_expired: Arc<AtomicBool>,
    // Fetched once at login, never invalidated afterwards.
    profile: OnceCell<Profile>,
    boosters_cache: Arc<Mutex<Option<Vec<Booster>>>>,
    orders_cache: Arc<Mutex<Option<Vec<Order>>>>,
    bulk_config_cache: Arc<Mutex<Option<Option<BulkPricingConfig>>>>,
    price_table_cache: Arc<Mutex<Option<Option<PriceTable>>>>,
}

impl DataManager {
    pub fn new() -> Result<Self, DataManagerInitError> {
        let session = Arc::new(Session::new());
        let session_expired = Arc::new(AtomicBool::new(false));
        let expired_flag = Arc::clone(&session_expired);
        session.on_invalidated(move || {
            expired_flag.store(true, Ordering::Relaxed);
        });

        let client = Arc::new(ApiClient::new(Arc::clone(&session))?);
        if !client.health_check() {
            return Err(DataManagerInitError::ServerUnreachable);
        }

        let email = env::var(EMAIL_VAR).map_err(|_| DataManagerInitError::MissingCredentials(EMAIL_VAR))?;
        let password =
            env::var(PASSWORD_VAR).map_err(|_| DataManagerInitError::MissingCredentials(PASSWORD_VAR))?;
        client.login(&email, &password).map_err(DataManagerInitError::LoginFailed)?;

        let profile_json = client
            .request(ApiRequest::Profile)
            .map_err(DataManagerInitError::ProfileFailed)?;
        let profile = parse_profile(&profile_json).map_err(DataManagerInitError::ProfileInvalid)?;

        Ok(Self {
            client,
            session,
            session_expired,
            profile: OnceCell::from(profile),
            boosters_cache: Arc::new(Mutex::new(None)),
            orders_cache: Arc::new(Mutex::new(None)),
            bulk_config_cache: Arc::new(Mutex::new(None)),
            price_table_cache: Arc::new(Mutex::new(None)),
        })
    }

    pub fn client(&self) -> Arc<ApiClient> {
        Arc::clone(&self.client)
    }

    pub fn get_profile(&self) -> &Profile {
        self.profile.get().unwrap()
    }

    pub fn session_expired(&self) -> bool {
        self.session_expired.load(Ordering::Relaxed)
    }

    // Generic async wrapper that executes fetch in a thread
    pub fn async_wrapper<T, F>(&self, fetch_fn: F) -> Receiver<DataRetrievalResult<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> DataRetrievalResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = fetch_fn();
            tx.send(result).ok();
        });

        rx
    }

    pub fn get_boosters(&self) -> Receiver<DataRetrievalResult<Vec<Booster>>> {
        let client = Arc::clone(&self.client);
        let cache = Arc::clone(&self.boosters_cache);

        self.async_wrapper(move || {
            let mut cache_guard = cache.lock().unwrap();

            if let Some(boosters) = cache_guard.as_ref() {
                return Ok(boosters.clone());
            }

            let boosters_json = client.request(ApiRequest::Boosters)?;
            let boosters = parse_boosters(&boosters_json)?;

            *cache_guard = Some(boosters.clone());
            Ok(boosters)
        })
    }

    pub fn get_my_orders(&self) -> Receiver<DataRetrievalResult<Vec<Order>>> {
        let client = Arc::clone(&self.client);
        let cache = Arc::clone(&self.orders_cache);

        self.async_wrapper(move || {
            let mut cache_guard = cache.lock().unwrap();

            if let Some(orders) = cache_guard.as_ref() {
                return Ok(orders.clone());
            }

            let orders_json = client.request(ApiRequest::MyOrders)?;
            let orders = parse_orders(&orders_json)?;

            *cache_guard = Some(orders.clone());
            Ok(orders)
        })
    }

    /// Own bulk configuration; `None` when nothing has been saved yet,
    /// which is a regular state, not a failure.
    pub fn get_bulk_config(&self) -> Receiver<DataRetrievalResult<Option<BulkPricingConfig>>> {
        let client = Arc::clone(&self.client);
        let cache = Arc::clone(&self.bulk_config_cache);

        self.async_wrapper(move || {
            let mut cache_guard = cache.lock().unwrap();

            if let Some(config) = cache_guard.as_ref() {
                return Ok(config.clone());
            }

            let config = match client.request(ApiRequest::BulkConfig) {
                Ok(config_json) => Some(parse_bulk_config(&config_json)?),
                Err(RequestError::NotFound) => None,
                Err(err) => return Err(err.into()),
            };

            *cache_guard = Some(config.clone());
            Ok(config)
        })
    }

    pub fn get_my_price_table(&self) -> Receiver<DataRetrievalResult<Option<PriceTable>>> {
        let client = Arc::clone(&self.client);
        let cache = Arc::clone(&self.price_table_cache);

        self.async_wrapper(move || {
            let mut cache_guard = cache.lock().unwrap();

            if let Some(table) = cache_guard.as_ref() {
                return Ok(table.clone());
            }

            let table = match client.request(ApiRequest::MyPriceTable) {
                Ok(table_json) => Some(parse_price_table(&table_json)?),
                Err(RequestError::NotFound) => None,
                Err(err) => return Err(err.into()),
            };

            *cache_guard = Some(table.clone());
            Ok(table)
        })
    }

    pub fn get_my_booster_profile(&self) -> Receiver<DataRetrievalResult<Option<BoosterProfile>>> {
        let client = Arc::clone(&self.client);

        self.async_wrapper(move || match client.request(ApiRequest::MyBoosterProfile) {
            Ok(profile_json) => Ok(Some(parse_booster_profile(&profile_json)?)),
            Err(RequestError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        })
    }

    pub fn create_order(
        &self,
        booster: BoosterId,
        intent: OrderIntent,
        estimated_price: f64,
    ) -> Receiver<DataRetrievalResult<Order>> {
        let client = Arc::clone(&self.client);
        let orders_cache = Arc::clone(&self.orders_cache);

        self.async_wrapper(move || {
            let order_json = client.request(ApiRequest::CreateOrder {
                booster,
                intent,
                estimated_price,
            })?;
            let order = parse_order(&order_json)?;

            // The cached order list is stale now.
            *orders_cache.lock().unwrap() = None;
            Ok(order)
        })
    }

    pub fn toggle_availability(&self) -> Receiver<DataRetrievalResult<()>> {
        let client = Arc::clone(&self.client);
        let boosters_cache = Arc::clone(&self.boosters_cache);

        self.async_wrapper(move || {
            client.request(ApiRequest::ToggleAvailability)?;
            *boosters_cache.lock().unwrap() = None;
            Ok(())
        })
    }

    pub fn refresh(&self) {
        *self.boosters_cache.lock().unwrap() = None;
        *self.orders_cache.lock().unwrap() = None;
        *self.bulk_config_cache.lock().unwrap() = None;
        *self.price_table_cache.lock().unwrap() = None;
    }

    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }
}

pub type DataRetrievalResult<T> = Result<T, DataRetrievalError>;

#[derive(Debug)]
pub enum DataManagerInitError {
    ClientFailed(ClientInitError),
    ServerUnreachable,
    MissingCredentials(&'static str),
    LoginFailed(RequestError),
    ProfileFailed(RequestError),
    ProfileInvalid(ParsingError),
}

impl fmt::Display for DataManagerInitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataManagerInitError::ClientFailed(err) => write!(f, "Client setup failed: {}", err),
            DataManagerInitError::ServerUnreachable => {
                write!(f, "The marketplace API did not answer the health check")
            }
            DataManagerInitError::MissingCredentials(var) => {
                write!(f, "Environment variable {} is not set", var)
            }
            DataManagerInitError::LoginFailed(err) => write!(f, "Login failed: {}", err),
            DataManagerInitError::ProfileFailed(err) => write!(f, "Could not load profile: {}", err),
            DataManagerInitError::ProfileInvalid(err) => write!(f, "Profile response invalid: {}", err),
        }
    }
}

impl From<ClientInitError> for DataManagerInitError {
    fn from(error: ClientInitError) -> Self {
        Self::ClientFailed(error)
    }
}

#[derive(Debug)]
pub enum DataRetrievalError {
    ClientFailed(RequestError),
    ParsingFailed(ParsingError),
}

impl fmt::Display for DataRetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataRetrievalError::ClientFailed(err) => write!(f, "Request failed: {}", err),
            DataRetrievalError::ParsingFailed(err) => write!(f, "Response invalid: {}", err),
        }
    }
}

impl From<RequestError> for DataRetrievalError {
    fn from(error: RequestError) -> Self {
        Self::ClientFailed(error)
    }
}

impl From<ParsingError> for DataRetrievalError {
    fn from(error: ParsingError) -> Self {
        Self::ParsingFailed(error)
    }
}
