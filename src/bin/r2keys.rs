
use r2_access_keys::access_keys::{AccessKeysClient, Credentials};
use r2_access_keys::report;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let creds = Credentials::from_env();
    let client = AccessKeysClient::new(&creds.api_token);

    let stdout = std::io::stdout();
    report::run(&client, &creds, &mut stdout.lock())?;

    Ok(())
}
