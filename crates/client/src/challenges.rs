use api_types::{
    Id, Listing, Payload,
    challenge::{Challenge, ChallengeBody},
};
use reqwest::Method;

use crate::{Client, error::Result};

impl Client {
    /// `GET /Challenge`.
    pub async fn challenges_list(&self) -> Result<Vec<Challenge>> {
        let req = self.request(Method::GET, "Challenge");
        Ok(self.send::<Listing<Challenge>>(req).await?.into_items())
    }

    /// `GET /Challenge/{id}`.
    pub async fn challenge_get(&self, id: &Id) -> Result<Challenge> {
        let req = self.request(Method::GET, &format!("Challenge/{id}"));
        Ok(self.send::<Payload<Challenge>>(req).await?.into_inner())
    }

    /// `POST /Challenge`. Dates are converted to UTC before sending.
    pub async fn challenge_create(&self, body: ChallengeBody) -> Result<()> {
        let req = self
            .request(Method::POST, "Challenge")
            .json(&body.normalized());
        self.send_unit(req).await
    }

    /// `PUT /Challenge/{id}`. Dates are converted to UTC before sending.
    pub async fn challenge_update(&self, id: &Id, body: ChallengeBody) -> Result<()> {
        let req = self
            .request(Method::PUT, &format!("Challenge/{id}"))
            .json(&body.normalized());
        self.send_unit(req).await
    }

    /// `DELETE /Challenge/{id}`.
    pub async fn challenge_delete(&self, id: &Id) -> Result<()> {
        let req = self.request(Method::DELETE, &format!("Challenge/{id}"));
        self.send_unit(req).await
    }

    /// Re-sends `challenge` with only `isComplete` changed.
    pub async fn challenge_set_complete(&self, challenge: &Challenge, done: bool) -> Result<()> {
        let mut body = ChallengeBody::from_challenge(challenge);
        body.is_complete = done;
        self.challenge_update(&challenge.id, body).await
    }
}
