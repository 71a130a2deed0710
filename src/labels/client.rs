// ==========================================
// 工厂提货明细拆分系统 - 积加箱唛下载客户端
// ==========================================
// 流程: dataGrid 查询 -> batchPrintLabels 提交(限频)
//       -> 轮询传输中心 -> 取下载URL -> ZIP 落盘
// 红线: 基线之前已存在的下载记录不算本次产物
// ==========================================

use super::error::{LabelError, LabelResult};
use super::rate_limiter::{PrintRateLimiter, DEFAULT_PRINT_COOLDOWN};
use super::workbook::{read_label_request, LabelRequest};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

const BASE_URL: &str = "https://gateway.apist.gerpgo.com";
const DATA_GRID_URL: &str = "/supply/tms/query/shipment/dataGrid";
const BATCH_PRINT_URL: &str = "/supply/tms/shipment/batchPrintLabels";
const GET_DOWNLOAD_LIST_URL: &str = "/v2/download/reportDownload/getDownloadList";
const GET_BATCH_FILE_URL: &str = "/v2/download/reportDownload/getBatchFileUrl";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36 Edg/143.0.0.0";

const ZIP_PREFIX: &str = "FBA_SHIPMENT_";
const ZIP_SUFFIX: &str = ".zip";

/// 调用方在页面上抓到的两段凭据
#[derive(Debug, Clone)]
pub struct LabelAuth {
    pub token: String,
    pub cookie: String,
}

#[derive(Debug, Clone)]
pub struct LabelClientConfig {
    pub cooldown: Duration,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub lookback: Duration,
}

impl Default for LabelClientConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_PRINT_COOLDOWN,
            poll_interval: Duration::from_secs(3),
            poll_timeout: Duration::from_secs(240),
            lookback: Duration::from_secs(180),
        }
    }
}

/// 一次运行共享的会话: 同一 HTTP 连接池 + 同一限频器
pub struct LabelSession {
    http: reqwest::Client,
    auth: LabelAuth,
    config: LabelClientConfig,
    limiter: PrintRateLimiter,
}

impl LabelSession {
    pub fn new(auth: LabelAuth, config: LabelClientConfig) -> Self {
        let limiter = PrintRateLimiter::new(config.cooldown);
        Self {
            http: reqwest::Client::new(),
            auth,
            config,
            limiter,
        }
    }

    /// 单个拆分产物: 读取FBA ID -> 打印 -> 下载ZIP到同目录。
    /// 文件里没有FBA货件号时跳过,返回 None。
    pub async fn download_labels_for_file(&mut self, xlsx_path: &Path) -> LabelResult<Option<PathBuf>> {
        let request = read_label_request(xlsx_path)?;
        if request.is_empty() {
            info!("未发现FBA ID,跳过箱唛: {}", xlsx_path.display());
            return Ok(None);
        }

        let tasks = self.build_print_tasks(&request).await?;
        self.submit_print(&tasks, xlsx_path).await?;
        let submit_time = Local::now().naive_local();

        let picked = self.poll_download_list(submit_time).await?;
        let zip_path = self.fetch_zip(&picked, xlsx_path).await?;
        info!("箱唛ZIP下载完成: {}", zip_path.display());
        Ok(Some(zip_path))
    }

    async fn build_print_tasks(&self, request: &LabelRequest) -> LabelResult<Vec<Value>> {
        let payload = json!({
            "__inner_refresh": true,
            "sort": "id",
            "order": "descend",
            "shipmentIdList": request.fba_ids,
            "type": "FBA",
            "page": 1,
            "pagesize": 200,
        });
        let body = self
            .post_json(DATA_GRID_URL, &payload, PageContext::FbaShipment)
            .await?;
        let rows = extract_grid_rows(&body);

        let mut tasks = Vec::new();
        for row in rows {
            let Some(sid) = pick_str(row, &["shipmentId", "shipmentID", "shipment_id", "shipmentNo"])
            else {
                continue;
            };
            let sid_key = sid.trim().to_uppercase();
            if !request.fba_ids.contains(&sid_key) {
                continue;
            }

            // 箱数优先用拆分文件的映射,其次API返回,保底 1
            let qty = request
                .cartons
                .get(&sid_key)
                .copied()
                .or_else(|| {
                    pick_u32(
                        row,
                        &["cartonQuantity", "boxNum", "packingBoxNum", "cartonNum", "carton_count"],
                    )
                })
                .unwrap_or(1)
                .max(1);
            info!("FBA {} -> 打印箱数 {}", sid_key, qty);

            let mut task = json!({
                "printQuantity": qty,
                "pageType": "PackageLabel_Thermal_100_100",
                "printType": "Package",
                "hideShipFrom": false,
                "hideShipTo": false,
                "reorderFlag": false,
                "waterMarkFlag": false,
                "productNameFlag": false,
                "waterMarkTemplateId": "",
            });
            match row.get("id") {
                Some(internal_id) if !internal_id.is_null() => {
                    task["id"] = internal_id.clone();
                }
                _ => {
                    task["shipmentNo"] = Value::String(sid.to_string());
                }
            }
            tasks.push(task);
        }

        if tasks.is_empty() {
            return Err(LabelError::NoPrintableTasks);
        }
        Ok(tasks)
    }

    async fn submit_print(&mut self, tasks: &[Value], xlsx_path: &Path) -> LabelResult<()> {
        let wait = self.limiter.acquire_wait();
        if !wait.is_zero() {
            info!("打印限频等待 {}s", wait.as_secs());
            tokio::time::sleep(wait).await;
        }

        let body = Value::Array(tasks.to_vec());
        let resp = self
            .request(reqwest::Method::POST, BATCH_PRINT_URL, PageContext::FbaShipment)
            .json(&body)
            .send()
            .await?;
        let status = resp.status().as_u16();
        if status != 200 && status != 203 {
            return Err(LabelError::Api {
                status,
                body: truncate(&resp.text().await.unwrap_or_default(), 300),
            });
        }
        info!(
            "已提交FBA箱唛打印: {} ({} 个任务)",
            xlsx_path.display(),
            tasks.len()
        );
        Ok(())
    }

    async fn poll_download_list(&self, submit_time: NaiveDateTime) -> LabelResult<Value> {
        let baseline = self.fetch_download_rows().await?;
        let base_ids: Vec<String> = baseline
            .iter()
            .filter_map(|r| r.get("id").map(value_to_string))
            .collect();

        let earliest = submit_time
            - ChronoDuration::seconds(self.config.lookback.as_secs() as i64);
        let deadline = std::time::Instant::now() + self.config.poll_timeout;

        while std::time::Instant::now() < deadline {
            let rows = self.fetch_download_rows().await?;
            let mut candidates: Vec<&Value> = rows
                .iter()
                .filter(|r| {
                    let Some(id) = r.get("id") else { return false };
                    if base_ids.contains(&value_to_string(id)) {
                        return false;
                    }
                    if !is_target_zip(r) {
                        return false;
                    }
                    match parse_row_time(r) {
                        Some(t) => t >= earliest,
                        None => true,
                    }
                })
                .collect();
            if !candidates.is_empty() {
                candidates.sort_by_key(|r| {
                    r.get("id").and_then(Value::as_i64).unwrap_or(0)
                });
                if let Some(picked) = candidates.last() {
                    return Ok((*picked).clone());
                }
            }
            tokio::time::sleep(self.config.poll_interval.max(Duration::from_secs(1))).await;
        }
        Err(LabelError::DownloadTimeout)
    }

    async fn fetch_download_rows(&self) -> LabelResult<Vec<Value>> {
        let today = Local::now().date_naive();
        let start = today - ChronoDuration::days(1);
        let resp = self
            .request(reqwest::Method::GET, GET_DOWNLOAD_LIST_URL, PageContext::TransmissionCenter)
            .query(&[
                ("order", String::new()),
                ("page", "1".to_string()),
                ("pagesize", "50".to_string()),
                ("startDate", start.format("%Y-%m-%d").to_string()),
                ("endDate", today.format("%Y-%m-%d").to_string()),
                ("dateType", "1".to_string()),
            ])
            .send()
            .await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        if !(200..300).contains(&status) {
            return Err(LabelError::Api {
                status,
                body: truncate(&text, 200),
            });
        }
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(extract_download_rows(&body))
    }

    async fn fetch_zip(&self, picked: &Value, xlsx_path: &Path) -> LabelResult<PathBuf> {
        let file_id = picked.get("id").cloned().unwrap_or(Value::Null);
        let file_name = pick_str(picked, &["fileName", "filename"])
            .unwrap_or("labels.zip")
            .to_string();

        let body = json!([{ "id": file_id, "fileName": file_name }]);
        let resp_body = self
            .post_json(GET_BATCH_FILE_URL, &body, PageContext::TransmissionCenter)
            .await?;
        let url = resp_body
            .get("data")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(LabelError::EmptyDownloadUrl)?;

        let bytes = self
            .http
            .get(url)
            .header("user-agent", USER_AGENT)
            .timeout(Duration::from_secs(180))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let out_dir = xlsx_path.parent().unwrap_or_else(|| Path::new("."));
        let out_zip = out_dir.join(&file_name);
        std::fs::write(&out_zip, &bytes)?;
        Ok(out_zip)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        ctx: PageContext,
    ) -> LabelResult<Value> {
        let resp = self
            .request(reqwest::Method::POST, path, ctx)
            .json(body)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        if !(200..300).contains(&status) {
            return Err(LabelError::Api {
                status,
                body: truncate(&text, 300),
            });
        }
        match serde_json::from_str(&text) {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!("接口返回非JSON({}),按空对象处理", e);
                Ok(Value::Null)
            }
        }
    }

    fn request(&self, method: reqwest::Method, path: &str, ctx: PageContext) -> reqwest::RequestBuilder {
        let (page_url, page_title) = ctx.page_fields();
        debug!("{} {}", method, path);
        self.http
            .request(method, format!("{}{}", BASE_URL, path))
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "zh-cn")
            .header("content-type", "application/json")
            .header("origin", "https://luteos.app.gerpgo.com")
            .header("referer", "https://luteos.app.gerpgo.com/")
            .header("user-agent", USER_AGENT)
            .header("x-auth-token", &self.auth.token)
            .header("x-api-id", Uuid::new_v4().to_string())
            .header("x-page-id", Uuid::new_v4().to_string())
            .header("x-page-title", page_title)
            .header("x-page-url", page_url)
            .header("cookie", &self.auth.cookie)
            .timeout(Duration::from_secs(30))
    }
}

#[derive(Clone, Copy)]
enum PageContext {
    FbaShipment,
    TransmissionCenter,
}

impl PageContext {
    fn page_fields(self) -> (&'static str, &'static str) {
        match self {
            // FBA货件 页
            PageContext::FbaShipment => ("/amzv-app/tms/fbaShipment", "FBA%E8%B4%A7%E4%BB%B6"),
            // 传输中心 页
            PageContext::TransmissionCenter => (
                "/amzv-app/platform/reports/transmission-center",
                "%E4%BC%A0%E8%BE%93%E4%B8%AD%E5%BF%83",
            ),
        }
    }
}

/// dataGrid 返回的行列表位置不固定,逐个常见字段探一遍
fn extract_grid_rows(body: &Value) -> Vec<&Value> {
    if let Some(data) = body.get("data") {
        if let Some(obj) = data.as_object() {
            for key in ["rows", "list", "records", "data", "result", "items"] {
                if let Some(arr) = obj.get(key).and_then(Value::as_array) {
                    return arr.iter().collect();
                }
            }
        }
        if let Some(arr) = data.as_array() {
            return arr.iter().collect();
        }
    }
    Vec::new()
}

fn extract_download_rows(body: &Value) -> Vec<Value> {
    let mut rows: Vec<Value> = Vec::new();
    if let Some(obj) = body.get("data").and_then(Value::as_object) {
        for key in ["list", "records", "rows", "data", "result", "items"] {
            if let Some(arr) = obj.get(key).and_then(Value::as_array) {
                rows = arr.clone();
                break;
            }
        }
    }
    rows.retain(|r| pick_str(r, &["fileName", "filename"]).is_some());
    rows
}

fn is_target_zip(row: &Value) -> bool {
    match pick_str(row, &["fileName", "filename"]) {
        Some(fn_) => fn_.starts_with(ZIP_PREFIX) && fn_.to_lowercase().ends_with(ZIP_SUFFIX),
        None => false,
    }
}

/// requestTime/gmtCreate 等字段: 秒或毫秒时间戳,或 "YYYY-mm-dd HH:MM:SS"
fn parse_row_time(row: &Value) -> Option<NaiveDateTime> {
    for key in ["requestTime", "gmtCreate", "createTime", "applyTime"] {
        let Some(v) = row.get(key) else { continue };
        if let Some(n) = v.as_f64() {
            let secs = if n > 10_000_000_000.0 { n / 1000.0 } else { n };
            return chrono::DateTime::from_timestamp(secs as i64, 0)
                .map(|dt| dt.with_timezone(&Local).naive_local());
        }
        if let Some(s) = v.as_str() {
            if s.len() >= 19 {
                if let Ok(t) = NaiveDateTime::parse_from_str(&s[..19], "%Y-%m-%d %H:%M:%S") {
                    return Some(t);
                }
            }
        }
    }
    None
}

fn pick_str<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| row.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

fn pick_u32(row: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|k| {
        let v = row.get(*k)?;
        if let Some(n) = v.as_u64() {
            return u32::try_from(n).ok();
        }
        v.as_str()?.trim().parse::<f64>().ok().map(|f| f as u32)
    })
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_grid_rows_variants() {
        let body = json!({"data": {"records": [{"shipmentId": "FBA15A"}]}});
        assert_eq!(extract_grid_rows(&body).len(), 1);
        let body = json!({"data": [{"shipmentId": "FBA15A"}]});
        assert_eq!(extract_grid_rows(&body).len(), 1);
        let body = json!({"code": 500});
        assert!(extract_grid_rows(&body).is_empty());
    }

    #[test]
    fn test_is_target_zip() {
        assert!(is_target_zip(&json!({"fileName": "FBA_SHIPMENT_20260830.ZIP"})));
        assert!(!is_target_zip(&json!({"fileName": "INVOICE_001.zip"})));
        assert!(!is_target_zip(&json!({"other": 1})));
    }

    #[test]
    fn test_parse_row_time_formats() {
        let t = parse_row_time(&json!({"requestTime": "2026-08-30 10:20:30"})).unwrap();
        assert_eq!(t.format("%H:%M:%S").to_string(), "10:20:30");
        assert!(parse_row_time(&json!({"gmtCreate": 1756520430000u64})).is_some());
        assert!(parse_row_time(&json!({"note": "x"})).is_none());
    }

    #[test]
    fn test_pick_u32_accepts_numeric_strings() {
        assert_eq!(pick_u32(&json!({"boxNum": "7"}), &["boxNum"]), Some(7));
        assert_eq!(pick_u32(&json!({"boxNum": 7}), &["boxNum"]), Some(7));
        assert_eq!(pick_u32(&json!({"boxNum": "x"}), &["boxNum"]), None);
    }
}
