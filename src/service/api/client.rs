use std::{env, fmt, sync::Arc, time::Duration};

use json::JsonValue;
use reqwest::{blocking::Client, Method, StatusCode};

use crate::{
    model::{
        ids::{BoosterId, MatchId, OrderId, UserId},
        order::{OrderIntent, OrderStatus},
        pricing::{BulkPricingConfig, PriceTableEntry},
        rank::{BoostTarget, Rank},
        user::Role,
    },
    service::session::Session,
};

const BASE_URL_VAR: &str = "RIFTBOOST_API_URL";
const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The full endpoint surface of the marketplace API. Every variant knows
/// its method, path, and body; the client only moves bytes.
#[derive(Debug, Clone)]
pub enum ApiRequest {
    // Auth
    Register {
        email: String,
        password: String,
        display_name: String,
    },
    Login {
        email: String,
        password: String,
    },
    Profile,
    // Boosters
    Boosters,
    Booster(BoosterId),
    MyBoosterProfile,
    UpdateBoosterProfile {
        bio: String,
        languages: Vec<String>,
    },
    ToggleAvailability,
    // Orders
    CreateOrder {
        booster: BoosterId,
        intent: OrderIntent,
        estimated_price: f64,
    },
    MyOrders,
    AssignedOrders,
    Order(OrderId),
    UpdateOrderStatus {
        order: OrderId,
        status: OrderStatus,
    },
    UpdateOrderProgress {
        order: OrderId,
        rank: Rank,
    },
    ProcessPayment {
        order: OrderId,
        reference: String,
    },
    ApprovePayment(OrderId),
    RejectPayment(OrderId),
    CancelOrder(OrderId),
    // Matches
    AddMatch {
        order: OrderId,
        champion: String,
        victory: bool,
    },
    Matches(OrderId),
    DeleteMatch {
        order: OrderId,
        match_id: MatchId,
    },
    // Reviews
    CreateReview {
        order: OrderId,
        rating: u8,
        comment: String,
    },
    BoosterReviews(BoosterId),
    // Admin
    AdminStats,
    AdminUsers,
    AdminUpdateUser {
        user: UserId,
        role: Role,
    },
    AdminDeleteUser(UserId),
    AdminBoosters,
    AdminUpdateBooster {
        booster: BoosterId,
        available: bool,
    },
    AdminOrders,
    AdminUpdateOrder {
        order: OrderId,
        status: OrderStatus,
    },
    // Pricing
    PriceTable(BoosterId),
    CalculatePrice {
        booster: BoosterId,
        from: Rank,
        to: Rank,
    },
    MyPriceTable,
    UpdateMyPriceTable(Vec<PriceTableEntry>),
    DeletePriceEntry {
        from: Rank,
        to: Rank,
    },
    // Bulk pricing
    BulkConfig,
    UpdateBulkConfig(BulkPricingConfig),
    CalculateBulk {
        from: Rank,
        to: Rank,
    },
    // Misc
    HealthCheck,
}

impl ApiRequest {
    fn endpoint(&self) -> (Method, String) {
        match self {
            ApiRequest::Register { .. } => (Method::POST, "/auth/register".to_string()),
            ApiRequest::Login { .. } => (Method::POST, "/auth/login".to_string()),
            ApiRequest::Profile => (Method::GET, "/auth/profile".to_string()),
            ApiRequest::Boosters => (Method::GET, "/boosters".to_string()),
            ApiRequest::Booster(id) => (Method::GET, format!("/boosters/{}", id)),
            ApiRequest::MyBoosterProfile => (Method::GET, "/boosters/me".to_string()),
            ApiRequest::UpdateBoosterProfile { .. } => (Method::PUT, "/boosters/me".to_string()),
            ApiRequest::ToggleAvailability => (Method::PUT, "/boosters/me/availability".to_string()),
            ApiRequest::CreateOrder { .. } => (Method::POST, "/orders".to_string()),
            ApiRequest::MyOrders => (Method::GET, "/orders/mine".to_string()),
            ApiRequest::AssignedOrders => (Method::GET, "/orders/assigned".to_string()),
            ApiRequest::Order(id) => (Method::GET, format!("/orders/{}", id)),
            ApiRequest::UpdateOrderStatus { order, .. } => (Method::PUT, format!("/orders/{}/status", order)),
            ApiRequest::UpdateOrderProgress { order, .. } => (Method::PUT, format!("/orders/{}/progress", order)),
            ApiRequest::ProcessPayment { order, .. } => (Method::POST, format!("/orders/{}/payment", order)),
            ApiRequest::ApprovePayment(order) => (Method::POST, format!("/orders/{}/payment/approve", order)),
            ApiRequest::RejectPayment(order) => (Method::POST, format!("/orders/{}/payment/reject", order)),
            ApiRequest::CancelOrder(order) => (Method::POST, format!("/orders/{}/cancel", order)),
            ApiRequest::AddMatch { order, .. } => (Method::POST, format!("/orders/{}/matches", order)),
            ApiRequest::Matches(order) => (Method::GET, format!("/orders/{}/matches", order)),
            ApiRequest::DeleteMatch { order, match_id } => {
                (Method::DELETE, format!("/orders/{}/matches/{}", order, match_id))
            }
            ApiRequest::CreateReview { .. } => (Method::POST, "/reviews".to_string()),
            ApiRequest::BoosterReviews(id) => (Method::GET, format!("/reviews/booster/{}", id)),
            ApiRequest::AdminStats => (Method::GET, "/admin/stats".to_string()),
            ApiRequest::AdminUsers => (Method::GET, "/admin/users".to_string()),
            ApiRequest::AdminUpdateUser { user, .. } => (Method::PUT, format!("/admin/users/{}", user)),
            ApiRequest::AdminDeleteUser(user) => (Method::DELETE, format!("/admin/users/{}", user)),
            ApiRequest::AdminBoosters => (Method::GET, "/admin/boosters".to_string()),
            ApiRequest::AdminUpdateBooster { booster, .. } => (Method::PUT, format!("/admin/boosters/{}", booster)),
            ApiRequest::AdminOrders => (Method::GET, "/admin/orders".to_string()),
            ApiRequest::AdminUpdateOrder { order, .. } => (Method::PUT, format!("/admin/orders/{}", order)),
            ApiRequest::PriceTable(id) => (Method::GET, format!("/pricing/booster/{}", id)),
            ApiRequest::CalculatePrice { booster, from, to } => (
                Method::GET,
                format!(
                    "/pricing/calculate?booster={}&{}",
                    urlencoding::encode(&booster.0),
                    rank_pair_query(from, to)
                ),
            ),
            ApiRequest::MyPriceTable => (Method::GET, "/pricing/me".to_string()),
            ApiRequest::UpdateMyPriceTable(_) => (Method::PUT, "/pricing/me".to_string()),
            ApiRequest::DeletePriceEntry { from, to } => {
                (Method::DELETE, format!("/pricing/me/entry?{}", rank_pair_query(from, to)))
            }
            ApiRequest::BulkConfig => (Method::GET, "/bulk-pricing/me".to_string()),
            ApiRequest::UpdateBulkConfig(_) => (Method::PUT, "/bulk-pricing/me".to_string()),
            ApiRequest::CalculateBulk { from, to } => {
                (Method::GET, format!("/bulk-pricing/calculate?{}", rank_pair_query(from, to)))
            }
            ApiRequest::HealthCheck => (Method::GET, "/health".to_string()),
        }
    }

    fn body(&self) -> Option<JsonValue> {
        match self {
            ApiRequest::Register {
                email,
                password,
                display_name,
            } => Some(json::object! {
                email: email.as_str(),
                password: password.as_str(),
                displayName: display_name.as_str(),
            }),
            ApiRequest::Login { email, password } => Some(json::object! {
                email: email.as_str(),
                password: password.as_str(),
            }),
            ApiRequest::UpdateBoosterProfile { bio, languages } => Some(json::object! {
                bio: bio.as_str(),
                languages: languages.iter().map(|l| l.as_str()).collect::<Vec<_>>(),
            }),
            ApiRequest::CreateOrder {
                booster,
                intent,
                estimated_price,
            } => {
                let mut body = json::object! {
                    boosterId: booster.0.as_str(),
                    startRank: rank_json(&intent.start),
                    duo: intent.options.duo,
                    offline: intent.options.offline,
                    privateStream: intent.options.private_stream,
                    estimatedPrice: *estimated_price,
                };
                match &intent.target {
                    BoostTarget::Rank(rank) => body["targetRank"] = rank_json(rank),
                    BoostTarget::Wins { tier, count } => {
                        body["targetTier"] = tier.name().into();
                        body["winCount"] = (*count).into();
                    }
                }
                if let Some(champion) = &intent.options.champion {
                    body["champion"] = champion.as_str().into();
                }
                if let Some(lane) = intent.options.lane {
                    body["lane"] = lane.name().into();
                }
                Some(body)
            }
            ApiRequest::UpdateOrderStatus { status, .. } => Some(json::object! { status: status.as_str() }),
            ApiRequest::UpdateOrderProgress { rank, .. } => Some(json::object! { currentRank: rank_json(rank) }),
            ApiRequest::ProcessPayment { reference, .. } => Some(json::object! { reference: reference.as_str() }),
            ApiRequest::AddMatch { champion, victory, .. } => Some(json::object! {
                champion: champion.as_str(),
                victory: *victory,
            }),
            ApiRequest::CreateReview { order, rating, comment } => Some(json::object! {
                orderId: order.0.as_str(),
                rating: *rating,
                comment: comment.as_str(),
            }),
            ApiRequest::AdminUpdateUser { role, .. } => Some(json::object! { role: role.as_str() }),
            ApiRequest::AdminUpdateBooster { available, .. } => Some(json::object! { available: *available }),
            ApiRequest::AdminUpdateOrder { status, .. } => Some(json::object! { status: status.as_str() }),
            ApiRequest::UpdateMyPriceTable(entries) => {
                let items: Vec<JsonValue> = entries
                    .iter()
                    .map(|e| {
                        json::object! {
                            from: rank_json(&e.from),
                            to: rank_json(&e.to),
                            price: e.price,
                        }
                    })
                    .collect();
                Some(json::object! { entries: items })
            }
            ApiRequest::UpdateBulkConfig(config) => {
                let mut prices = JsonValue::new_object();
                for (tier, price) in &config.division_prices {
                    prices[tier.name()] = (*price).into();
                }
                let mut fees = JsonValue::new_object();
                for (tier, fee) in &config.transition_fees {
                    fees[tier.name()] = (*fee).into();
                }
                Some(json::object! {
                    divisionPrices: prices,
                    transitionFees: fees,
                })
            }
            _ => None,
        }
    }

    fn requires_auth(&self) -> bool {
        !matches!(
            self,
            ApiRequest::Register { .. } | ApiRequest::Login { .. } | ApiRequest::HealthCheck
        )
    }
}

fn rank_json(rank: &Rank) -> JsonValue {
    json::object! {
        tier: rank.tier.name(),
        division: rank.division.label(),
    }
}

fn rank_pair_query(from: &Rank, to: &Rank) -> String {
    format!(
        "fromTier={}&fromDivision={}&toTier={}&toDivision={}",
        from.tier.name(),
        from.division.label(),
        to.tier.name(),
        to.division.label()
    )
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(session: Arc<Session>) -> Result<Self, ClientInitError> {
        let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn health_check(&self) -> bool {
        match self.request(ApiRequest::HealthCheck) {
            Ok(_) => true,
            Err(_) => false,
        }
    }

    /// Logs in and stores the bearer token in the session.
    pub fn login(&self, email: &str, password: &str) -> Result<JsonValue, RequestError> {
        let response = self.request(ApiRequest::Login {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        match response["token"].as_str() {
            Some(token) => self.session.set_token(token.to_string()),
            None => return Err(RequestError::MissingToken),
        }
        Ok(response)
    }

    pub fn request(&self, request: ApiRequest) -> Result<JsonValue, RequestError> {
        let (method, path) = request.endpoint();
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self.client.request(method, url);
        if request.requires_auth() {
            match self.session.token() {
                Some(token) => builder = builder.bearer_auth(token),
                None => return Err(RequestError::NotLoggedIn),
            }
        }
        if let Some(body) = request.body() {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.dump());
        }

        let response = builder.send()?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED && request.requires_auth() {
            // The only cross-cutting error policy in the client: evict the
            // token and let the session fan the news out.
            self.session.invalidate();
            return Err(RequestError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RequestError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RequestError::InvalidResponse(status.as_u16(), body));
        }

        let text = response.text()?;
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        Ok(json::parse(&text)?)
    }
}

#[derive(Debug)]
pub enum ClientInitError {
    HttpClientCreation(reqwest::Error),
}

impl fmt::Display for ClientInitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientInitError::HttpClientCreation(err) => write!(f, "Failed to create HTTP client: {}", err),
        }
    }
}

impl From<reqwest::Error> for ClientInitError {
    fn from(error: reqwest::Error) -> Self {
        Self::HttpClientCreation(error)
    }
}

#[derive(Debug)]
pub enum RequestError {
    NetworkError(reqwest::Error),
    NotLoggedIn,
    Unauthorized,
    NotFound,
    MissingToken,
    InvalidResponse(u16, String),
    ParsingFailed(json::Error),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestError::NetworkError(err) => write!(f, "Network error: {}", err),
            RequestError::NotLoggedIn => write!(f, "Not logged in"),
            RequestError::Unauthorized => write!(f, "Session rejected by the server"),
            RequestError::NotFound => write!(f, "Resource not found"),
            RequestError::MissingToken => write!(f, "Login response carried no token"),
            RequestError::InvalidResponse(status, body) => {
                write!(f, "Server returned error {}: {}", status, body)
            }
            RequestError::ParsingFailed(err) => write!(f, "Failed to parse JSON response: {}", err),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        RequestError::NetworkError(error)
    }
}

impl From<json::Error> for RequestError {
    fn from(error: json::Error) -> Self {
        RequestError::ParsingFailed(error)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        order::{BoostOptions, OrderIntent},
        rank::{Division, Tier},
    };

    use super::*;

    #[test]
    fn only_register_login_and_health_skip_auth() {
        assert!(!ApiRequest::HealthCheck.requires_auth());
        assert!(!ApiRequest::Login {
            email: "a@b.c".into(),
            password: "pw".into()
        }
        .requires_auth());
        assert!(ApiRequest::Boosters.requires_auth());
        assert!(ApiRequest::BulkConfig.requires_auth());
    }

    #[test]
    fn endpoints_map_to_method_and_path() {
        let order = || OrderId("9".into());
        let cases: Vec<(ApiRequest, Method, &str)> = vec![
            (
                ApiRequest::Register {
                    email: "a@b.c".into(),
                    password: "pw".into(),
                    display_name: "A".into(),
                },
                Method::POST,
                "/auth/register",
            ),
            (ApiRequest::Profile, Method::GET, "/auth/profile"),
            (ApiRequest::Booster(BoosterId("3".into())), Method::GET, "/boosters/3"),
            (ApiRequest::MyBoosterProfile, Method::GET, "/boosters/me"),
            (
                ApiRequest::UpdateBoosterProfile {
                    bio: "".into(),
                    languages: vec![],
                },
                Method::PUT,
                "/boosters/me",
            ),
            (ApiRequest::ToggleAvailability, Method::PUT, "/boosters/me/availability"),
            (ApiRequest::MyOrders, Method::GET, "/orders/mine"),
            (ApiRequest::AssignedOrders, Method::GET, "/orders/assigned"),
            (ApiRequest::Order(order()), Method::GET, "/orders/9"),
            (
                ApiRequest::UpdateOrderStatus {
                    order: order(),
                    status: OrderStatus::Paid,
                },
                Method::PUT,
                "/orders/9/status",
            ),
            (
                ApiRequest::UpdateOrderProgress {
                    order: order(),
                    rank: Rank::new(Tier::Gold, Division::Two),
                },
                Method::PUT,
                "/orders/9/progress",
            ),
            (
                ApiRequest::ProcessPayment {
                    order: order(),
                    reference: "tx".into(),
                },
                Method::POST,
                "/orders/9/payment",
            ),
            (ApiRequest::ApprovePayment(order()), Method::POST, "/orders/9/payment/approve"),
            (ApiRequest::RejectPayment(order()), Method::POST, "/orders/9/payment/reject"),
            (ApiRequest::CancelOrder(order()), Method::POST, "/orders/9/cancel"),
            (
                ApiRequest::AddMatch {
                    order: order(),
                    champion: "Ahri".into(),
                    victory: true,
                },
                Method::POST,
                "/orders/9/matches",
            ),
            (ApiRequest::Matches(order()), Method::GET, "/orders/9/matches"),
            (
                ApiRequest::DeleteMatch {
                    order: order(),
                    match_id: MatchId("4".into()),
                },
                Method::DELETE,
                "/orders/9/matches/4",
            ),
            (
                ApiRequest::CreateReview {
                    order: order(),
                    rating: 5,
                    comment: "".into(),
                },
                Method::POST,
                "/reviews",
            ),
            (
                ApiRequest::BoosterReviews(BoosterId("3".into())),
                Method::GET,
                "/reviews/booster/3",
            ),
            (ApiRequest::AdminStats, Method::GET, "/admin/stats"),
            (ApiRequest::AdminUsers, Method::GET, "/admin/users"),
            (
                ApiRequest::AdminUpdateUser {
                    user: UserId("5".into()),
                    role: Role::Booster,
                },
                Method::PUT,
                "/admin/users/5",
            ),
            (ApiRequest::AdminDeleteUser(UserId("5".into())), Method::DELETE, "/admin/users/5"),
            (ApiRequest::AdminBoosters, Method::GET, "/admin/boosters"),
            (
                ApiRequest::AdminUpdateBooster {
                    booster: BoosterId("3".into()),
                    available: false,
                },
                Method::PUT,
                "/admin/boosters/3",
            ),
            (ApiRequest::AdminOrders, Method::GET, "/admin/orders"),
            (
                ApiRequest::AdminUpdateOrder {
                    order: order(),
                    status: OrderStatus::Cancelled,
                },
                Method::PUT,
                "/admin/orders/9",
            ),
            (ApiRequest::PriceTable(BoosterId("3".into())), Method::GET, "/pricing/booster/3"),
            (ApiRequest::MyPriceTable, Method::GET, "/pricing/me"),
            (ApiRequest::UpdateMyPriceTable(vec![]), Method::PUT, "/pricing/me"),
            (
                ApiRequest::DeletePriceEntry {
                    from: Rank::new(Tier::Iron, Division::Four),
                    to: Rank::new(Tier::Iron, Division::One),
                },
                Method::DELETE,
                "/pricing/me/entry?fromTier=Iron&fromDivision=IV&toTier=Iron&toDivision=I",
            ),
            (ApiRequest::BulkConfig, Method::GET, "/bulk-pricing/me"),
            (
                ApiRequest::CalculateBulk {
                    from: Rank::new(Tier::Iron, Division::Four),
                    to: Rank::new(Tier::Iron, Division::One),
                },
                Method::GET,
                "/bulk-pricing/calculate?fromTier=Iron&fromDivision=IV&toTier=Iron&toDivision=I",
            ),
            (ApiRequest::HealthCheck, Method::GET, "/health"),
        ];

        for (request, method, path) in cases {
            let (m, p) = request.endpoint();
            assert_eq!(m, method, "{:?}", request);
            assert_eq!(p, path, "{:?}", request);
        }
    }

    #[test]
    fn calculate_price_encodes_the_rank_pair() {
        let (method, path) = ApiRequest::CalculatePrice {
            booster: BoosterId("42".into()),
            from: Rank::new(Tier::Iron, Division::Four),
            to: Rank::new(Tier::Bronze, Division::Two),
        }
        .endpoint();

        assert_eq!(method, Method::GET);
        assert_eq!(
            path,
            "/pricing/calculate?booster=42&fromTier=Iron&fromDivision=IV&toTier=Bronze&toDivision=II"
        );
    }

    #[test]
    fn create_order_body_carries_the_win_target() {
        let body = ApiRequest::CreateOrder {
            booster: BoosterId("7".into()),
            intent: OrderIntent {
                start: Rank::apex(Tier::Master),
                target: BoostTarget::Wins {
                    tier: Tier::Master,
                    count: 5,
                },
                options: BoostOptions::default(),
            },
            estimated_price: 40.0,
        }
        .body()
        .unwrap();

        assert_eq!(body["targetTier"], "Master");
        assert_eq!(body["winCount"], 5);
        assert!(body["targetRank"].is_null());
        assert!(body["champion"].is_null());
    }

    #[test]
    fn bulk_config_body_is_keyed_by_tier_name() {
        let mut config = BulkPricingConfig::default();
        config.division_prices.insert(Tier::Iron, 5.0);
        config.transition_fees.insert(Tier::Bronze, 10.0);

        let body = ApiRequest::UpdateBulkConfig(config).body().unwrap();
        assert_eq!(body["divisionPrices"]["Iron"], 5.0);
        assert_eq!(body["transitionFees"]["Bronze"], 10.0);
    }
}
