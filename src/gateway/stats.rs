//! Native stats endpoint, used as a connectivity and credentials check.

use reqwest::Method;

use crate::transport::{DataplaneClient, DataplaneResult};

impl DataplaneClient {
    /// `GET stats/native`; succeeds when the API is reachable and accepts our credentials.
    pub async fn ping(&self) -> DataplaneResult<()> {
        let url = self.endpoint(&["stats", "native"], &[])?;
        self.call_empty(Method::GET, url).await
    }
}
