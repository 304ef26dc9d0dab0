use napi_derive::napi;

use crate::translate_sql_to_request;

#[napi(js_name = "translateSqlJson")]
pub fn translate_sql_json(sql: String) -> napi::Result<String> {
    let request = translate_sql_to_request(&sql)
        .map_err(|err| napi::Error::from_reason(format!("{err} [{}]", err.kind())))?;

    serde_json::to_string(&request).map_err(|err| napi::Error::from_reason(err.to_string()))
}
