use api_types::{
    Id, Listing, Payload, Reply,
    transaction::{StatusCode, TransactionRecord},
};
use engine::{EngineError, Transaction, TransactionId, TransactionStatus, apply_status};
use reqwest::Method;

use crate::{Client, error::Result};

impl Client {
    /// `GET /Transaction?page=&pageSize=`.
    pub async fn transactions_list(&self, page: u32, page_size: u32) -> Result<Vec<Transaction>> {
        let req = self
            .request(Method::GET, "Transaction")
            .query(&[("page", page), ("pageSize", page_size)]);
        let records = self.send::<Listing<TransactionRecord>>(req).await?;
        decode_all(records.into_items())
    }

    /// `GET /Transaction/user/{userId}?page=&pageSize=`.
    pub async fn transactions_by_user(
        &self,
        user_id: &Id,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Transaction>> {
        let req = self
            .request(Method::GET, &format!("Transaction/user/{user_id}"))
            .query(&[("page", page), ("pageSize", page_size)]);
        let records = self.send::<Listing<TransactionRecord>>(req).await?;
        decode_all(records.into_items())
    }

    /// `GET /Transaction/{id}`.
    pub async fn transaction_get(&self, id: &Id) -> Result<Transaction> {
        let req = self.request(Method::GET, &format!("Transaction/{id}"));
        let record = self.send::<Payload<TransactionRecord>>(req).await?;
        Ok(decode(record.into_inner())?)
    }

    /// `PUT /Transaction/{id}` with the full record.
    ///
    /// Returns the record echoed by the server, or `transaction` itself when
    /// the response has no body or only acknowledges the write.
    pub async fn transaction_update(&self, id: &Id, transaction: &Transaction) -> Result<Transaction> {
        let req = self
            .request(Method::PUT, &format!("Transaction/{id}"))
            .json(&encode(transaction));
        match self
            .send_optional::<Reply<TransactionRecord>>(req)
            .await?
            .and_then(Reply::into_data)
        {
            Some(record) => Ok(decode(record)?),
            None => Ok(transaction.clone()),
        }
    }

    /// Moves a transaction out of `Pending`.
    ///
    /// The current record is fetched first and the transition is checked
    /// against it; an invalid transition fails before anything is written.
    /// A valid one sends exactly one full-record `PUT`.
    ///
    /// Nothing guards the gap between the read and the write: another admin
    /// finalizing the same transaction in between is overwritten.
    pub async fn transaction_set_status(
        &self,
        id: &Id,
        next: TransactionStatus,
        reason: Option<String>,
    ) -> Result<Transaction> {
        let current = self.transaction_get(id).await?;
        let updated = apply_status(&current, next, reason).inspect_err(|err| {
            tracing::warn!(transaction = %id, "status change rejected: {err}");
        })?;
        tracing::info!(
            transaction = %id,
            from = %current.status,
            to = %next,
            "updating transaction status"
        );
        self.transaction_update(id, &updated).await
    }
}

fn decode_all(records: Vec<TransactionRecord>) -> Result<Vec<Transaction>> {
    Ok(records
        .into_iter()
        .map(decode)
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Converts a wire record into the domain type.
pub fn decode(record: TransactionRecord) -> std::result::Result<Transaction, EngineError> {
    let status = match &record.status {
        StatusCode::Code(code) => TransactionStatus::from_code(*code)?,
        StatusCode::Name(name) => TransactionStatus::from_label(name)
            .ok_or_else(|| EngineError::InvalidStatus(name.clone()))?,
    };
    Ok(Transaction {
        id: match record.id {
            Id::Number(n) => TransactionId::Number(n),
            Id::Text(text) => TransactionId::Text(text),
        },
        user_id: record.user_id,
        user_name: record.user_name,
        total_payment: record.total_payment,
        payment_date: record.payment_date,
        status,
        reason: record.reason,
    })
}

/// The id as the server sent it, number or string.
pub fn wire_id(id: &TransactionId) -> Id {
    match id {
        TransactionId::Number(n) => Id::Number(*n),
        TransactionId::Text(text) => Id::Text(text.clone()),
    }
}

/// Converts a domain transaction into the full-record `PUT` body.
pub fn encode(transaction: &Transaction) -> TransactionRecord {
    TransactionRecord {
        id: wire_id(&transaction.id),
        user_id: transaction.user_id,
        user_name: transaction.user_name.clone(),
        total_payment: transaction.total_payment,
        payment_date: transaction.payment_date.clone(),
        status: StatusCode::Code(transaction.status.code()),
        reason: transaction.reason.clone(),
    }
}
