// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portal upload driver.
//!
//! Drives a Chrome session through the portal's CSV upload flow:
//! 1. Navigate to the activity-entry page
//! 2. Authenticate by submitting the registrant's email
//! 3. Attach the CSV export to the file input
//! 4. Remove the blank placeholder row the portal seeds after an attach
//! 5. Submit the first activity row's form
//! 6. Verify the success indicator
//!
//! The portal-specific selectors live in `PortalUploader`; the browser
//! only ever sees generic form operations through the `FormDriver`
//! trait, so the flow runs against a fake driver in tests and the
//! selectors can change without touching pipeline logic.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::{Element, Page};
use futures_util::StreamExt;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Poll interval while waiting for page elements.
const POLL_INTERVAL_MS: u64 = 250;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Minimal browser capabilities the upload flow needs.
///
/// Element lookups are bounded polls, not fixed sleeps: the page's DOM
/// timing is not under our control.
#[async_trait]
pub trait FormDriver: Send + Sync {
    /// Load a page.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Type `value` into the input with the given `name` attribute.
    async fn fill_by_name(&self, name: &str, value: &str) -> Result<()>;

    /// Submit the form owning the control with the given `name`.
    async fn submit_by_name(&self, name: &str) -> Result<()>;

    /// Point the file input with the given `name` at a local file.
    async fn attach_file_by_name(&self, name: &str, path: &Path) -> Result<()>;

    /// Click the button whose attribute `attr` equals `value`.
    async fn click_by_attr(&self, attr: &str, value: &str) -> Result<()>;

    /// Wait up to `timeout` for the element with `id` to become visible.
    async fn wait_visible(&self, id: &str, timeout: Duration) -> Result<bool>;

    /// Tear the session down. Called exactly once per session.
    async fn close(&mut self) -> Result<()>;
}

/// Something that can push a CSV export to the portal.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, csv_path: &Path) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Portal flow
// ---------------------------------------------------------------------------

/// Drives the portal's upload form.
pub struct PortalUploader {
    page_url: String,
    email: String,
    element_timeout: Duration,
}

impl PortalUploader {
    pub fn new(config: &Config) -> Self {
        Self {
            page_url: config.portal_page_url(),
            email: config.email.clone(),
            element_timeout: Duration::from_secs(config.element_timeout_secs),
        }
    }

    /// Run the upload steps against an already-open session.
    pub async fn drive<D: FormDriver>(&self, driver: &D, csv_path: &Path) -> Result<()> {
        tracing::info!(url = %self.page_url, "Opening portal upload page");
        driver.goto(&self.page_url).await?;

        // The portal establishes a session from the email alone; there
        // is no password step in this flow.
        driver.fill_by_name("email", &self.email).await?;
        driver.submit_by_name("email").await?;
        tracing::debug!("Submitted portal email");

        driver.attach_file_by_name("activities_file", csv_path).await?;
        tracing::debug!(path = %csv_path.display(), "Attached CSV export");

        // The importer always seeds one blank activity row after an
        // attach; it has to go before the submit.
        driver.click_by_attr("value", "delete").await?;

        driver.submit_by_name("activity[1][comment]").await?;
        tracing::debug!("Submitted activity rows");

        if !driver
            .wait_visible("vrActivitiesSuccess", self.element_timeout)
            .await?
        {
            return Err(AppError::UploadRejected);
        }

        tracing::info!("Portal accepted the CSV upload");
        Ok(())
    }

    /// Drive the flow and close the session on both exit paths.
    pub async fn upload_with<D: FormDriver>(&self, mut driver: D, csv_path: &Path) -> Result<()> {
        let result = self.drive(&driver, csv_path).await;
        let closed = driver.close().await;
        result.and(closed)
    }
}

#[async_trait]
impl Uploader for PortalUploader {
    async fn upload(&self, csv_path: &Path) -> Result<()> {
        let driver = ChromeFormDriver::launch(self.element_timeout).await?;
        self.upload_with(driver, csv_path).await
    }
}

// ---------------------------------------------------------------------------
// Chrome-backed driver
// ---------------------------------------------------------------------------

/// `FormDriver` backed by a local headless Chrome/Chromium over CDP.
pub struct ChromeFormDriver {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
    page: Page,
    element_timeout: Duration,
}

impl ChromeFormDriver {
    /// Launch a headless Chrome session.
    pub async fn launch(element_timeout: Duration) -> Result<Self> {
        let chrome = find_chrome().ok_or_else(|| {
            AppError::Configuration(
                "Chrome/Chromium not found; install one to run uploads".to_string(),
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .build()
            .map_err(AppError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;
        let handler_task = tokio::spawn(async move { while (handler.next().await).is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            handler_task,
            page,
            element_timeout,
        })
    }

    /// Poll for a selector until it resolves or the deadline passes.
    async fn wait_for_element(&self, selector: &str) -> Result<Element> {
        let deadline = Instant::now() + self.element_timeout;
        loop {
            match self.page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(_) if Instant::now() < deadline => {
                    tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
                Err(e) => {
                    return Err(AppError::Browser(format!(
                        "Element {:?} not found within {:?}: {}",
                        selector, self.element_timeout, e
                    )))
                }
            }
        }
    }

    /// Evaluate JS returning `{ok, error?}` and fail on `ok: false`.
    async fn eval_ok(&self, js: String) -> Result<()> {
        let v: serde_json::Value = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?
            .into_value()
            .map_err(|e| AppError::Browser(e.to_string()))?;

        if v.get("ok").and_then(|x| x.as_bool()).unwrap_or(false) {
            return Ok(());
        }
        let err = v
            .get("error")
            .and_then(|x| x.as_str())
            .unwrap_or("unknown error");
        Err(AppError::Browser(format!("Form interaction failed: {}", err)))
    }
}

#[async_trait]
impl FormDriver for ChromeFormDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::Browser(format!("Navigation to {} failed: {}", url, e)))?;
        Ok(())
    }

    async fn fill_by_name(&self, name: &str, value: &str) -> Result<()> {
        let selector = format!("[name={}]", css_string(name));
        let element = self.wait_for_element(&selector).await?;
        element
            .focus()
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?;
        Ok(())
    }

    async fn submit_by_name(&self, name: &str) -> Result<()> {
        // Make sure the control is on the page before poking its form.
        self.wait_for_element(&format!("[name={}]", css_string(name)))
            .await?;

        let js = format!(
            r#"(function() {{
  const el = document.getElementsByName({name})[0];
  if (!el) return {{ ok: false, error: "control not found" }};
  const form = el.form || el.closest('form');
  if (!form) return {{ ok: false, error: "control has no form" }};
  if (typeof form.requestSubmit === 'function') {{ form.requestSubmit(); }} else {{ form.submit(); }}
  return {{ ok: true }};
}})()"#,
            name = js_string(name)
        );
        self.eval_ok(js).await
    }

    async fn attach_file_by_name(&self, name: &str, path: &Path) -> Result<()> {
        let selector = format!("input[name={}]", css_string(name));
        let element = self.wait_for_element(&selector).await?;

        // The portal needs an absolute path; CDP rejects relative ones.
        let file = path
            .canonicalize()
            .map_err(AppError::Io)?
            .to_string_lossy()
            .into_owned();

        let params = SetFileInputFilesParams::builder()
            .file(file)
            .backend_node_id(element.backend_node_id)
            .build()
            .map_err(AppError::Browser)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| AppError::Browser(format!("Failed to attach file: {}", e)))?;
        Ok(())
    }

    async fn click_by_attr(&self, attr: &str, value: &str) -> Result<()> {
        let selector = format!("button[{}={}]", attr, css_string(value));
        let element = self.wait_for_element(&selector).await?;
        element
            .click()
            .await
            .map_err(|e| AppError::Browser(e.to_string()))?;
        Ok(())
    }

    async fn wait_visible(&self, id: &str, timeout: Duration) -> Result<bool> {
        let js = format!(
            r#"(function() {{
  const el = document.getElementById({id});
  if (!el) return {{ visible: false }};
  const rect = el.getBoundingClientRect();
  const style = window.getComputedStyle(el);
  const visible = rect.width > 0 && rect.height > 0
    && style.visibility !== 'hidden' && style.display !== 'none';
  return {{ visible }};
}})()"#,
            id = js_string(id)
        );

        let deadline = Instant::now() + timeout;
        loop {
            let v: serde_json::Value = self
                .page
                .evaluate(js.clone())
                .await
                .map_err(|e| AppError::Browser(e.to_string()))?
                .into_value()
                .map_err(|e| AppError::Browser(e.to_string()))?;

            if v.get("visible").and_then(|x| x.as_bool()).unwrap_or(false) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| AppError::Browser(format!("Failed to close browser: {}", e)))?;
        self.handler_task.abort();
        Ok(())
    }
}

impl Drop for ChromeFormDriver {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Quote a string for embedding in a JS source snippet.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Quote an attribute value for a CSS selector. JSON string syntax is a
/// valid CSS quoted string for the attribute names the portal uses.
fn css_string(s: &str) -> String {
    js_string(s)
}

/// Find a Chrome/Chromium executable.
fn find_chrome() -> Option<String> {
    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(output) = std::process::Command::new("which").arg(name).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(path);
                }
            }
        }
    }

    let candidates = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];
    candidates
        .iter()
        .find(|c| std::path::Path::new(c).exists())
        .map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes_and_brackets() {
        assert_eq!(js_string("email"), "\"email\"");
        assert_eq!(
            js_string("activity[1][comment]"),
            "\"activity[1][comment]\""
        );
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }
}
