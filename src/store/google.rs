//! Google Sheets client authenticated with a service account.
//!
//! Every [`WorksheetClient::open_by_name`] call loads the credential blob,
//! exchanges a signed JWT for an access token, finds the spreadsheet through
//! the Drive API and resolves its first worksheet. The returned
//! [`Worksheet`] carries the token used by the remaining calls.

use chrono::Utc;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use super::credentials::{JWT_BEARER_GRANT, SHEETS_SCOPES};
use super::{
    AccessToken, CellRange, CredentialSource, HorizontalAlignment, StoreError, StoreFuture,
    Worksheet, WorksheetClient,
};
use crate::domain::CellValue;

/// Production Sheets API base URL.
pub const DEFAULT_SHEETS_BASE: &str = "https://sheets.googleapis.com";

/// Production Drive API base URL.
pub const DEFAULT_DRIVE_BASE: &str = "https://www.googleapis.com";

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Base URLs of the Google APIs, overridable for testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    /// Sheets API base.
    pub sheets_base: String,
    /// Drive API base.
    pub drive_base: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            sheets_base: DEFAULT_SHEETS_BASE.to_string(),
            drive_base: DEFAULT_DRIVE_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: i64,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// [`WorksheetClient`] backed by the Google Sheets v4 and Drive v3 APIs.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    credentials: CredentialSource,
    endpoints: GoogleEndpoints,
}

impl GoogleSheetsClient {
    /// Creates a client that reads its key from `credentials` on every open.
    #[must_use]
    pub fn new(credentials: CredentialSource, endpoints: GoogleEndpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            endpoints,
        }
    }

    /// Exchanges a freshly signed assertion for an access token.
    ///
    /// # Errors
    ///
    /// Returns a credentials error if the key cannot be loaded or signed, and
    /// [`StoreError::Http`] / [`StoreError::Api`] if the exchange fails.
    pub async fn authorize(&self) -> Result<AccessToken, StoreError> {
        let key = self.credentials.load()?;
        let assertion = key.sign_assertion(SHEETS_SCOPES, Utc::now().timestamp())?;

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = read_json(response).await?;

        tracing::debug!(client_email = %key.client_email, "service account authorized");
        Ok(AccessToken::new(token.access_token))
    }

    async fn find_spreadsheet(&self, token: &AccessToken, title: &str) -> Result<String, StoreError> {
        let url = endpoint(&self.endpoints.drive_base, &["drive", "v3", "files"])?;
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME_TYPE}' and trashed = false",
            escape_query_literal(title)
        );
        let response = self
            .http
            .get(url)
            .bearer_auth(token.secret())
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;
        let list: FileList = read_json(response).await?;

        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| StoreError::SpreadsheetNotFound(title.to_string()))
    }

    async fn first_sheet(
        &self,
        token: &AccessToken,
        spreadsheet_id: &str,
    ) -> Result<SheetProperties, StoreError> {
        let url = endpoint(
            &self.endpoints.sheets_base,
            &["v4", "spreadsheets", spreadsheet_id],
        )?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token.secret())
            .query(&[("fields", "sheets.properties(sheetId,title,index)")])
            .send()
            .await?;
        let meta: SpreadsheetMeta = read_json(response).await?;

        meta.sheets
            .into_iter()
            .map(|entry| entry.properties)
            .min_by_key(|props| props.index)
            .ok_or_else(|| StoreError::NoWorksheet(spreadsheet_id.to_string()))
    }

    async fn get_values(&self, sheet: &Worksheet, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = endpoint(
            &self.endpoints.sheets_base,
            &["v4", "spreadsheets", &sheet.spreadsheet_id, "values", range],
        )?;
        let response = self
            .http
            .get(url)
            .bearer_auth(sheet.token.secret())
            .send()
            .await?;
        let values: ValueRange = read_json(response).await?;

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(displayed).collect())
            .collect())
    }
}

impl WorksheetClient for GoogleSheetsClient {
    fn open_by_name<'a>(&'a self, title: &'a str) -> StoreFuture<'a, Worksheet> {
        Box::pin(async move {
            let token = self.authorize().await?;
            let spreadsheet_id = self.find_spreadsheet(&token, title).await?;
            let props = self.first_sheet(&token, &spreadsheet_id).await?;

            tracing::debug!(
                spreadsheet = title,
                %spreadsheet_id,
                worksheet = %props.title,
                "worksheet opened"
            );
            Ok(Worksheet {
                spreadsheet_id,
                sheet_id: props.sheet_id,
                title: props.title,
                token,
            })
        })
    }

    fn read_all_values<'a>(&'a self, sheet: &'a Worksheet) -> StoreFuture<'a, Vec<Vec<String>>> {
        Box::pin(async move { self.get_values(sheet, &quoted_sheet(&sheet.title)).await })
    }

    fn read_header_row<'a>(&'a self, sheet: &'a Worksheet) -> StoreFuture<'a, Vec<String>> {
        Box::pin(async move {
            let range = format!("{}!1:1", quoted_sheet(&sheet.title));
            let rows = self.get_values(sheet, &range).await?;
            Ok(rows.into_iter().next().unwrap_or_default())
        })
    }

    fn append_row<'a>(&'a self, sheet: &'a Worksheet, row: &'a [CellValue]) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let range = format!("{}!A1:append", quoted_sheet(&sheet.title));
            let url = endpoint(
                &self.endpoints.sheets_base,
                &["v4", "spreadsheets", &sheet.spreadsheet_id, "values", &range],
            )?;
            let response = self
                .http
                .post(url)
                .bearer_auth(sheet.token.secret())
                .query(&[
                    ("valueInputOption", "RAW"),
                    ("insertDataOption", "INSERT_ROWS"),
                ])
                .json(&serde_json::json!({ "values": [row] }))
                .send()
                .await?;
            let _: IgnoredAny = read_json(response).await?;
            Ok(())
        })
    }

    fn format_range<'a>(
        &'a self,
        sheet: &'a Worksheet,
        range: CellRange,
        alignment: HorizontalAlignment,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let target = format!("{}:batchUpdate", sheet.spreadsheet_id);
            let url = endpoint(&self.endpoints.sheets_base, &["v4", "spreadsheets", &target])?;
            let body = serde_json::json!({
                "requests": [{
                    "repeatCell": {
                        "range": {
                            "sheetId": sheet.sheet_id,
                            "startRowIndex": 0,
                            "endRowIndex": range.rows(),
                            "startColumnIndex": 0,
                            "endColumnIndex": range.columns(),
                        },
                        "cell": {
                            "userEnteredFormat": {
                                "horizontalAlignment": alignment.as_api_str(),
                            }
                        },
                        "fields": "userEnteredFormat.horizontalAlignment",
                    }
                }]
            });
            let response = self
                .http
                .post(url)
                .bearer_auth(sheet.token.secret())
                .json(&body)
                .send()
                .await?;
            let _: IgnoredAny = read_json(response).await?;

            tracing::debug!(range = %range, alignment = alignment.as_api_str(), "range formatted");
            Ok(())
        })
    }
}

/// Builds `base/seg1/seg2/...`, percent-encoding each segment.
fn endpoint(base: &str, segments: &[&str]) -> Result<reqwest::Url, StoreError> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|err| StoreError::InvalidEndpoint(format!("{base}: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| StoreError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Decodes a successful JSON body, or turns an error status into
/// [`StoreError::Api`] carrying the response text.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StoreError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<T>().await?)
}

/// A1-notation sheet reference: `'Name'`, with embedded quotes doubled.
fn quoted_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Escapes a string literal for a Drive `q` expression.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn displayed(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use wiremock::matchers::{
        bearer_token, body_partial_json, body_string_contains, method, path, path_regex,
        query_param,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::{BlockForm, EventBlock, PersonalInfo, normalize};
    use crate::store::StoreAdapter;
    use crate::store::credentials::tests::key_json;

    const SPREADSHEET_ID: &str = "sheet-123";

    fn client_for(server: &MockServer) -> GoogleSheetsClient {
        let credentials = CredentialSource::Inline(key_json(&format!("{}/token", server.uri())));
        GoogleSheetsClient::new(
            credentials,
            GoogleEndpoints {
                sheets_base: server.uri(),
                drive_base: server.uri(),
            },
        )
    }

    async fn mount_auth_and_lookup(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.test",
                "expires_in": 3600,
                "token_type": "Bearer",
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(bearer_token("ya29.test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "files": [{ "id": SPREADSHEET_ID, "name": "resultados_entrenadores" }],
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v4/spreadsheets/{SPREADSHEET_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sheets": [
                    { "properties": { "sheetId": 77, "title": "Archive", "index": 1 } },
                    { "properties": { "sheetId": 0, "title": "Sheet1", "index": 0 } },
                ],
            })))
            .mount(server)
            .await;
    }

    fn record() -> crate::domain::ResultRecord {
        let Some(at) = NaiveDate::from_ymd_opt(2025, 6, 2).and_then(|d| d.and_hms_opt(8, 30, 0))
        else {
            panic!("valid timestamp");
        };
        let form = BlockForm::new(EventBlock::Championship, at.date());
        normalize(&PersonalInfo::default(), &form, &[], at)
    }

    #[tokio::test]
    async fn opens_first_worksheet_by_title() {
        let server = MockServer::start().await;
        mount_auth_and_lookup(&server).await;

        let client = client_for(&server);
        let Ok(sheet) = client.open_by_name("resultados_entrenadores").await else {
            panic!("worksheet should open");
        };
        assert_eq!(sheet.spreadsheet_id, SPREADSHEET_ID);
        assert_eq!(sheet.sheet_id, 0);
        assert_eq!(sheet.title, "Sheet1");
        assert_eq!(sheet.token.secret(), "ya29.test");
    }

    #[tokio::test]
    async fn append_posts_row_then_centers_used_range() {
        let server = MockServer::start().await;
        mount_auth_and_lookup(&server).await;

        Mock::given(method("POST"))
            .and(path_regex(r"^/v4/spreadsheets/sheet-123/values/'Sheet1'!A1:append$"))
            .and(query_param("valueInputOption", "RAW"))
            .and(body_string_contains("\"2025-06-02 08:30:00\""))
            .and(body_string_contains("\"South American Championship\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let header: Vec<String> = crate::domain::COLUMN_HEADERS
            .iter()
            .map(ToString::to_string)
            .collect();
        Mock::given(method("GET"))
            .and(path_regex(r"^/v4/spreadsheets/sheet-123/values/'Sheet1'$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [header, ["a"], ["b"]],
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/v4/spreadsheets/sheet-123/values/'Sheet1'!1:1$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [header],
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-123:batchUpdate"))
            .and(body_partial_json(serde_json::json!({
                "requests": [{
                    "repeatCell": {
                        "range": { "sheetId": 0, "endRowIndex": 3, "endColumnIndex": 14 },
                        "cell": { "userEnteredFormat": { "horizontalAlignment": "CENTER" } },
                    }
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = StoreAdapter::new(Arc::new(client_for(&server)), "resultados_entrenadores");
        let result = adapter.append(&record()).await;
        let Ok(receipt) = result else {
            panic!("append should succeed: {result:?}");
        };
        assert_eq!(receipt.total_rows, 3);
        assert_eq!(receipt.formatted_range.as_deref(), Some("A1:N3"));
    }

    #[tokio::test]
    async fn unknown_title_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "ya29.test" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "files": [] })))
            .mount(&server)
            .await;

        let result = client_for(&server).open_by_name("missing").await;
        assert!(matches!(result, Err(StoreError::SpreadsheetNotFound(t)) if t == "missing"));
    }

    #[tokio::test]
    async fn rejected_token_exchange_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let result = client_for(&server).open_by_name("resultados_entrenadores").await;
        assert!(matches!(
            result,
            Err(StoreError::Api { status: 401, ref message }) if message == "invalid_grant"
        ));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = GoogleSheetsClient::new(
            CredentialSource::environment("COACH_RESULTS_TEST_UNSET_CREDENTIALS"),
            GoogleEndpoints {
                sheets_base: server.uri(),
                drive_base: server.uri(),
            },
        );
        let result = client.open_by_name("resultados_entrenadores").await;
        assert!(result.as_ref().is_err_and(StoreError::is_credentials));
    }

    #[test]
    fn sheet_titles_are_quoted_for_a1() {
        assert_eq!(quoted_sheet("Sheet1"), "'Sheet1'");
        assert_eq!(quoted_sheet("Coach's"), "'Coach''s'");
    }

    #[test]
    fn drive_literals_are_escaped() {
        assert_eq!(escape_query_literal(r"a'b\c"), r"a\'b\\c");
    }

    #[test]
    fn endpoint_joins_segments_onto_base() {
        let Ok(url) = endpoint("https://sheets.googleapis.com", &["v4", "spreadsheets", "x"]) else {
            panic!("valid endpoint");
        };
        assert_eq!(url.as_str(), "https://sheets.googleapis.com/v4/spreadsheets/x");
    }
}
