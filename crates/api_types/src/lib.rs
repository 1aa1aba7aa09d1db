//! Wire types of the carbonboard REST API (`/api`).
//!
//! Field names follow the server's camelCase JSON. Responses come either bare
//! or inside an [`Envelope`]; [`Payload`], [`Reply`] and [`Listing`] accept exactly the
//! shapes the server is known to send and nothing else.

use serde::{Deserialize, Deserializer, Serialize};

/// Standard response wrapper `{ success, message, data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// A single entity, either wrapped in an [`Envelope`] or bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Wrapped(Envelope<T>),
    Bare(T),
}

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped(envelope) => envelope.data,
            Self::Bare(value) => value,
        }
    }
}

/// Body of a write acknowledged without data, e.g.
/// `{ "success": true, "message": "Updated" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to a write: the entity (wrapped or bare) or a bare
/// acknowledgement.
///
/// `Ack` is tried before `Bare` because records with all-default fields would
/// otherwise accept any object, an acknowledgement included.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Wrapped(Envelope<T>),
    Ack(Ack),
    Bare(T),
}

impl<T> Reply<T> {
    /// The returned entity, or `None` when the server only acknowledged.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Wrapped(envelope) => Some(envelope.data),
            Self::Ack(_) => None,
            Self::Bare(value) => Some(value),
        }
    }
}

/// One page of a paged listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    /// 1-based index of the first row on this page (0 when empty).
    pub fn first_row(&self) -> u64 {
        if self.total_count == 0 {
            return 0;
        }
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size) + 1
    }

    /// 1-based index of the last row on this page (0 when empty).
    pub fn last_row(&self) -> u64 {
        if self.total_count == 0 {
            return 0;
        }
        (u64::from(self.page) * u64::from(self.page_size)).min(self.total_count)
    }
}

/// A list response: bare array, `{ data: [...] }` or `{ data: Page }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped(Envelope<Vec<T>>),
    Paged(Envelope<Page<T>>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Wrapped(envelope) => envelope.data,
            Self::Paged(envelope) => envelope.data.data,
        }
    }
}

/// Identifier that the server sends either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl Default for Id {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Text is kept verbatim: `"007"` stays `"007"`.
impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::Text(value.trim().to_string())
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Treats JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod user {
    use super::*;

    /// Numeric role codes used by the server.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub enum Role {
        Admin,
        #[default]
        User,
        Staff,
    }

    impl Role {
        pub const ALL: [Role; 3] = [Role::Admin, Role::Staff, Role::User];

        pub fn code(self) -> u8 {
            match self {
                Self::Admin => 1,
                Self::User => 2,
                Self::Staff => 3,
            }
        }

        /// Unknown codes fall back to [`Role::User`].
        pub fn from_code(code: i64) -> Self {
            match code {
                1 => Self::Admin,
                3 => Self::Staff,
                _ => Self::User,
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Admin => "Admin",
                Self::User => "User",
                Self::Staff => "Staff",
            }
        }

        pub fn from_label(label: &str) -> Option<Self> {
            Self::ALL
                .into_iter()
                .find(|role| role.label().eq_ignore_ascii_case(label.trim()))
        }
    }

    impl Serialize for Role {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_u8(self.code())
        }
    }

    impl<'de> Deserialize<'de> for Role {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(Self::from_code(lenient_code(deserializer)?))
        }
    }

    /// Subscription tiers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub enum SubscriptionType {
        #[default]
        Free,
        Vip25,
        Vip50,
    }

    impl SubscriptionType {
        pub const ALL: [SubscriptionType; 3] = [
            SubscriptionType::Free,
            SubscriptionType::Vip25,
            SubscriptionType::Vip50,
        ];

        pub fn code(self) -> u8 {
            match self {
                Self::Free => 1,
                Self::Vip25 => 2,
                Self::Vip50 => 3,
            }
        }

        /// Unknown codes fall back to [`SubscriptionType::Free`].
        pub fn from_code(code: i64) -> Self {
            match code {
                2 => Self::Vip25,
                3 => Self::Vip50,
                _ => Self::Free,
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Free => "Free",
                Self::Vip25 => "VIP 25",
                Self::Vip50 => "VIP 50",
            }
        }
    }

    impl Serialize for SubscriptionType {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_u8(self.code())
        }
    }

    impl<'de> Deserialize<'de> for SubscriptionType {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(Self::from_code(lenient_code(deserializer)?))
        }
    }

    /// Reads a code sent as number, numeric string or `null` (0).
    fn lenient_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(n)) => n,
            Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0),
            None => 0,
        })
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct User {
        #[serde(default)]
        pub id: Id,
        #[serde(default, deserialize_with = "null_as_default")]
        pub user_name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        pub email: String,
        #[serde(default)]
        pub phone_number: Option<String>,
        #[serde(default)]
        pub date_of_birth: Option<String>,
        #[serde(default)]
        pub role: Role,
        #[serde(default)]
        pub subscription_type: SubscriptionType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    /// Login result, inside an envelope or at top level.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AuthResult {
        pub token: String,
        pub user: User,
    }

    /// Body of a successful `POST /User/login`.
    pub type LoginResponse = AuthResult;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterRequest {
        pub user_name: String,
        pub email: String,
        pub password: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub phone_number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub firstname: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub lastname: Option<String>,
    }

    /// Partial update: only the fields that are `Some` are sent.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub user_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub phone_number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub date_of_birth: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub subscription_type: Option<SubscriptionType>,
    }

    impl UserUpdate {
        pub fn is_empty(&self) -> bool {
            self.user_name.is_none()
                && self.email.is_none()
                && self.phone_number.is_none()
                && self.date_of_birth.is_none()
                && self.subscription_type.is_none()
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RoleUpdate {
        pub role: Role,
    }
}

pub mod challenge {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Challenge {
        #[serde(default)]
        pub id: Id,
        #[serde(default, deserialize_with = "null_as_default")]
        pub name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        pub description: String,
        #[serde(default)]
        pub start_date: Option<String>,
        #[serde(default)]
        pub end_date: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        pub is_complete: bool,
    }

    /// Create/update body. Dates are sent as UTC ISO-8601 timestamps.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChallengeBody {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub id: Option<Id>,
        pub name: String,
        pub description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<String>,
        pub is_complete: bool,
    }

    impl ChallengeBody {
        /// Copies `challenge` into an update body, with dates normalized.
        pub fn from_challenge(challenge: &Challenge) -> Self {
            Self {
                id: Some(challenge.id.clone()),
                name: challenge.name.clone(),
                description: challenge.description.clone(),
                start_date: challenge.start_date.clone(),
                end_date: challenge.end_date.clone(),
                is_complete: challenge.is_complete,
            }
            .normalized()
        }

        /// Rewrites both dates through [`to_utc_iso`], dropping unreadable ones.
        pub fn normalized(mut self) -> Self {
            self.start_date = self.start_date.as_deref().and_then(to_utc_iso);
            self.end_date = self.end_date.as_deref().and_then(to_utc_iso);
            self
        }
    }

    /// Normalizes a date input to a UTC timestamp such as
    /// `2025-10-02T00:00:00.000Z`.
    ///
    /// - `YYYY-MM-DD` is midnight UTC of that day;
    /// - timestamps with an offset are converted to UTC;
    /// - timestamps without an offset are taken as UTC.
    ///
    /// Returns `None` for empty or unreadable values.
    pub fn to_utc_iso(raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let utc = if !raw.contains('T') {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)?
                .and_utc()
        } else if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            dt.with_timezone(&Utc)
        } else {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?
                .and_utc()
        };

        Some(utc.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

pub mod transaction {
    use super::*;

    /// Transaction as sent by the server.
    ///
    /// `status` is the numeric code (0 Pending, 1 Completed, 2 Failed,
    /// 3 Cancelled); a status name is accepted too.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionRecord {
        #[serde(default)]
        pub id: Id,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub user_id: Option<i64>,
        #[serde(default, deserialize_with = "null_as_default")]
        pub user_name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        pub total_payment: f64,
        #[serde(default, deserialize_with = "null_as_default")]
        pub payment_date: String,
        #[serde(default)]
        pub status: StatusCode,
        #[serde(default)]
        pub reason: Option<String>,
    }

    /// Raw status value as it appears on the wire.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum StatusCode {
        Code(i64),
        Name(String),
    }

    impl Default for StatusCode {
        fn default() -> Self {
            Self::Code(0)
        }
    }

    /// Full-record replacement body for `PUT /Transaction/{id}`.
    pub type TransactionUpdate = TransactionRecord;
}

pub mod activity {
    use super::*;

    /// One usage reading.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
    pub struct Usage {
        #[serde(rename = "cO2emission", default)]
        pub co2_emission: Option<f64>,
    }

    /// One user's activity for one day.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserActivity {
        #[serde(default)]
        pub id: Option<Id>,
        #[serde(default)]
        pub user_name: Option<String>,
        #[serde(default)]
        pub date: Option<String>,
        #[serde(default)]
        pub plastic_usage: Option<Usage>,
        #[serde(default)]
        pub traffic_usage: Option<Usage>,
        #[serde(default)]
        pub energy_usage: Option<Usage>,
        #[serde(default)]
        pub food_usage: Option<Usage>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LeaderboardRow {
        #[serde(default)]
        pub user_name: Option<String>,
        #[serde(rename = "totalCO2Emission", default)]
        pub total_co2_emission: Option<f64>,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        activity::{LeaderboardRow, UserActivity},
        challenge::{ChallengeBody, to_utc_iso},
        transaction::{StatusCode, TransactionRecord},
        user::{AuthResult, Role, SubscriptionType, User},
        *,
    };

    #[test]
    fn payload_accepts_wrapped_and_bare() {
        let wrapped: Payload<User> = serde_json::from_str(
            r#"{"success":true,"message":"ok","data":{"id":3,"userName":"lan","email":"l@x.io","role":1}}"#,
        )
        .unwrap();
        let user = wrapped.into_inner();
        assert_eq!(user.id, Id::Number(3));
        assert_eq!(user.role, Role::Admin);

        let bare: Payload<User> =
            serde_json::from_str(r#"{"id":"u-9","userName":"an","email":"a@x.io"}"#).unwrap();
        let user = bare.into_inner();
        assert_eq!(user.id, Id::Text("u-9".to_string()));
        assert_eq!(user.role, Role::User);
        assert_eq!(user.subscription_type, SubscriptionType::Free);
    }

    #[test]
    fn reply_without_data_is_an_acknowledgement() {
        let ack: Reply<TransactionRecord> =
            serde_json::from_str(r#"{"success":true,"message":"Updated"}"#).unwrap();
        assert!(ack.into_data().is_none());

        let null_data: Reply<TransactionRecord> =
            serde_json::from_str(r#"{"success":true,"message":"Updated","data":null}"#).unwrap();
        assert!(null_data.into_data().is_none());

        let bare: Reply<TransactionRecord> =
            serde_json::from_str(r#"{"id":"007","status":1}"#).unwrap();
        let record = bare.into_data().unwrap();
        assert_eq!(record.id, Id::Text("007".to_string()));
        assert_eq!(record.status, StatusCode::Code(1));

        let wrapped: Reply<TransactionRecord> =
            serde_json::from_str(r#"{"success":true,"data":{"id":7,"status":2}}"#).unwrap();
        assert_eq!(wrapped.into_data().unwrap().id, Id::Number(7));
    }

    #[test]
    fn text_ids_are_not_parsed() {
        assert_eq!(Id::from("007"), Id::Text("007".to_string()));
        assert_eq!(Id::from(7), Id::Number(7));
        assert_eq!(Id::from("007").to_string(), "007");
    }

    #[test]
    fn login_result_inside_envelope() {
        let payload: Payload<AuthResult> = serde_json::from_str(
            r#"{"success":true,"message":"","data":{"token":"t0k","user":{"id":1,"userName":"root","email":"r@x.io","role":"1","subscriptionType":3}}}"#,
        )
        .unwrap();
        let auth = payload.into_inner();
        assert_eq!(auth.token, "t0k");
        assert_eq!(auth.user.role, Role::Admin);
        assert_eq!(auth.user.subscription_type, SubscriptionType::Vip50);
    }

    #[test]
    fn listing_accepts_observed_shapes() {
        let bare: Listing<TransactionRecord> =
            serde_json::from_str(r#"[{"id":1,"status":0,"totalPayment":5}]"#).unwrap();
        assert_eq!(bare.into_items().len(), 1);

        let wrapped: Listing<TransactionRecord> =
            serde_json::from_str(r#"{"success":true,"data":[{"id":1},{"id":2}]}"#).unwrap();
        assert_eq!(wrapped.into_items().len(), 2);

        let paged: Listing<TransactionRecord> = serde_json::from_str(
            r#"{"data":{"data":[{"id":1,"status":"Failed"}],"page":1,"pageSize":10,"totalCount":1,"totalPages":1}}"#,
        )
        .unwrap();
        let items = paged.into_items();
        assert_eq!(items[0].status, StatusCode::Name("Failed".to_string()));
    }

    #[test]
    fn page_row_range() {
        let page: Page<User> = serde_json::from_str(
            r#"{"data":[],"page":3,"pageSize":10,"totalCount":25,"totalPages":3}"#,
        )
        .unwrap();
        assert_eq!(page.first_row(), 21);
        assert_eq!(page.last_row(), 25);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let record: TransactionRecord = serde_json::from_str(
            r#"{"id":5,"userName":null,"totalPayment":null,"paymentDate":"2025-09-25","reason":null}"#,
        )
        .unwrap();
        assert_eq!(record.user_name, "");
        assert_eq!(record.total_payment, 0.0);
        assert_eq!(record.status, StatusCode::Code(0));
    }

    #[test]
    fn activity_usages_are_nested() {
        let activity: UserActivity = serde_json::from_str(
            r#"{"date":"2025-10-02T00:00:00","plasticUsage":{"cO2emission":1.5},"trafficUsage":null,"energyUsage":{"cO2emission":null},"foodUsage":{"cO2emission":2}}"#,
        )
        .unwrap();
        assert_eq!(activity.plastic_usage.and_then(|u| u.co2_emission), Some(1.5));
        assert_eq!(activity.traffic_usage, None);
        assert_eq!(activity.energy_usage.and_then(|u| u.co2_emission), None);

        let row: LeaderboardRow =
            serde_json::from_str(r#"{"userName":"ha","totalCO2Emission":12.25}"#).unwrap();
        assert_eq!(row.total_co2_emission, Some(12.25));
    }

    #[test]
    fn challenge_dates_are_sent_as_utc() {
        assert_eq!(
            to_utc_iso("2025-10-02").as_deref(),
            Some("2025-10-02T00:00:00.000Z")
        );
        assert_eq!(
            to_utc_iso("2025-10-02T08:30").as_deref(),
            Some("2025-10-02T08:30:00.000Z")
        );
        assert_eq!(
            to_utc_iso("2025-10-02T08:30:00+07:00").as_deref(),
            Some("2025-10-02T01:30:00.000Z")
        );
        assert_eq!(to_utc_iso("soon"), None);
        assert_eq!(to_utc_iso(""), None);

        let body = ChallengeBody {
            name: "No plastic week".to_string(),
            start_date: Some("2025-10-02".to_string()),
            end_date: Some("garbage".to_string()),
            ..Default::default()
        }
        .normalized();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["startDate"], "2025-10-02T00:00:00.000Z");
        assert!(json.get("endDate").is_none());
        assert!(json.get("id").is_none());
    }
}
