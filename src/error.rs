// Copyright 2022 Mathew Odden <mathewrodden@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("Access keys request failed")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("Access keys request failed: status='{status}', body='{body}'")]
    Status { status: u16, body: String },

    /// The body was not a JSON envelope
    #[error("Unexpected response from API")]
    Parse(#[from] serde_json::Error),

    #[error("No access keys found.")]
    NotFound,

    #[error("Failed to write output")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for a well-formed response that simply listed no keys.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}
