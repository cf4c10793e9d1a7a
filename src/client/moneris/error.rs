use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProviderError {
    #[snafu(display("cannot reach moneris: {source}"))]
    Http { source: reqwest::Error },
    #[snafu(display("moneris answered with http status {status}"))]
    Status { status: u16 },
    #[snafu(display("cannot encode moneris request: {message}"))]
    Encode { message: String },
    #[snafu(display("cannot decode moneris response: {message}"))]
    Decode { message: String },
    #[snafu(display("invalid authorization {authorization}, expected <trans_id>;<order_id>"))]
    InvalidAuthorization { authorization: String },
}
