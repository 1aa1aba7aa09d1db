use api_types::{
    Id, Page, Payload, Reply,
    user::{Role, RoleUpdate, User, UserUpdate},
};
use reqwest::{Method, RequestBuilder};

use crate::{Client, error::Result};

impl Client {
    /// `GET /User?page=&pageSize=`.
    pub async fn users_page(&self, page: u32, page_size: u32) -> Result<Page<User>> {
        let req = self
            .request(Method::GET, "User")
            .query(&[("page", page), ("pageSize", page_size)]);
        let mut result = self.send::<Payload<Page<User>>>(req).await?.into_inner();
        if result.page == 0 {
            result.page = page;
        }
        if result.page_size == 0 {
            result.page_size = page_size;
        }
        if result.total_pages == 0 {
            result.total_pages = 1;
        }
        Ok(result)
    }

    /// `GET /User/{id}`.
    pub async fn user_get(&self, id: &Id) -> Result<User> {
        let req = self.request(Method::GET, &format!("User/{id}"));
        Ok(self.send::<Payload<User>>(req).await?.into_inner())
    }

    /// `PUT /User/{id}` with the fields set in `update`.
    pub async fn user_update(&self, id: &Id, update: &UserUpdate) -> Result<User> {
        let req = self.request(Method::PUT, &format!("User/{id}")).json(update);
        self.user_written(id, req).await
    }

    /// `PUT /User/{id}/role`.
    pub async fn user_set_role(&self, id: &Id, role: Role) -> Result<User> {
        let req = self
            .request(Method::PUT, &format!("User/{id}/role"))
            .json(&RoleUpdate { role });
        self.user_written(id, req).await
    }

    /// Sends a user write; a reply without the user is followed by a re-read.
    async fn user_written(&self, id: &Id, req: RequestBuilder) -> Result<User> {
        match self
            .send_optional::<Reply<User>>(req)
            .await?
            .and_then(Reply::into_data)
        {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(user = %id, "write acknowledged without data, re-reading");
                self.user_get(id).await
            }
        }
    }

    /// `DELETE /User/{id}`.
    pub async fn user_delete(&self, id: &Id) -> Result<()> {
        let req = self.request(Method::DELETE, &format!("User/{id}"));
        self.send_unit(req).await
    }
}
