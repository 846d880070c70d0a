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

use std::io::Write;

use serde_json::value::Value;
use tracing::debug;

use crate::access_keys::{AccessKeysClient, Credentials};
use crate::error::Result;

/// Fetches the first access key for `creds`, writing each step to `out`.
///
/// Transport and parse failures are returned after the lines gathered so
/// far have been written. An empty listing is reported on `out` and is not
/// an error.
pub fn run<W: Write>(client: &AccessKeysClient, creds: &Credentials, out: &mut W) -> Result<()> {
    writeln!(out, "api_token: {}", creds.api_token)?;
    writeln!(out, "account_id: {}", creds.account_id)?;
    writeln!(out, "url: {}", client.access_keys_url(&creds.account_id))?;

    let resp = client.send(&creds.account_id)?;
    writeln!(out, "status: {}", resp.status.as_u16())?;
    writeln!(out, "response: {}", resp.body)?;

    let body = resp.body.clone();
    let envelope = resp.into_envelope()?;
    let parsed: Value = serde_json::from_str(&body)?;
    writeln!(out, "result: {}", parsed)?;

    match envelope.first_access_key() {
        Ok(key) => {
            debug!("Found access key {}", key.access_key_id);
            writeln!(out, "Access Key ID: {}", key.access_key_id)?;
            writeln!(out, "Secret Access Key: {}", key.secret_access_key)?;
        }
        Err(e) if e.is_not_found() => writeln!(out, "{}", e)?,
        Err(e) => return Err(e),
    }

    Ok(())
}
