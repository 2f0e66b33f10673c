//! Chromium over the DevTools protocol.
//!
//! Either launches a local browser or, when a debug URL is configured,
//! attaches to a running one. A spawned task drains the protocol handler for
//! as long as the driver lives.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Handler, Page};
use futures::StreamExt;
use menucrawl_core::BrowserSettings;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::task::JoinHandle;

use super::{Driver, FieldSpec, Launch, RawRecord, RenderSession};
use crate::error::DriverError;

impl From<CdpError> for DriverError {
    fn from(e: CdpError) -> Self {
        Self::Browser(e.to_string())
    }
}

/// Starts or attaches to Chromium according to [`BrowserSettings`].
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    settings: BrowserSettings,
}

impl ChromeLauncher {
    #[must_use]
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    fn browser_config(&self) -> Result<BrowserConfig, DriverError> {
        let mut builder = BrowserConfig::builder().request_timeout(self.request_timeout());
        if !self.settings.headless {
            builder = builder.with_head();
        }
        if self.settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }
        builder.build().map_err(DriverError::Browser)
    }
}

impl Launch for ChromeLauncher {
    type Driver = ChromeDriver;

    async fn launch(&self) -> Result<ChromeDriver, DriverError> {
        let (browser, handler, attached) = match &self.settings.debug_url {
            Some(debug_url) => {
                let ws_url = discover_websocket_url(debug_url, self.request_timeout()).await?;
                tracing::info!(%ws_url, "attaching to running browser");
                let (browser, handler) = Browser::connect(ws_url).await?;
                (browser, handler, true)
            }
            None => {
                tracing::info!(
                    headless = self.settings.headless,
                    executable = ?self.settings.executable,
                    "launching browser"
                );
                let (browser, handler) = Browser::launch(self.browser_config()?).await?;
                (browser, handler, false)
            }
        };

        Ok(ChromeDriver {
            browser,
            handler_task: spawn_handler(handler),
            attached,
        })
    }
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::warn!(error = %e, "browser handler event error");
            }
        }
    })
}

pub struct ChromeDriver {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// Attached to a browser this process did not start; leave it running.
    attached: bool,
}

impl Driver for ChromeDriver {
    type Session = ChromePage;

    async fn open_session(&self) -> Result<ChromePage, DriverError> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromePage { page })
    }

    async fn shutdown(mut self) -> Result<(), DriverError> {
        let result = if self.attached {
            Ok(())
        } else {
            let closed = self.browser.close().await.map(|_| ());
            if let Err(e) = self.browser.wait().await {
                tracing::warn!(error = %e, "browser process did not exit cleanly");
            }
            closed.map_err(DriverError::from)
        };
        self.handler_task.abort();
        result
    }
}

pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    async fn evaluate<T: DeserializeOwned>(&self, script: String) -> Result<T, DriverError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| DriverError::Evaluation(e.to_string()))
    }

    async fn element(&self, selector: &str) -> Result<Element, DriverError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| DriverError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

impl RenderSession for ChromePage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<(), DriverError> {
        let cleared: bool = self.evaluate(clear_value_script(selector)?).await?;
        if !cleared {
            return Err(DriverError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        let element = self.element(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.element(selector).await?.click().await?;
        Ok(())
    }

    async fn wait_for_navigation(&self) -> Result<(), DriverError> {
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize, DriverError> {
        self.evaluate(format!(
            "document.querySelectorAll({}).length",
            js_string(selector)?
        ))
        .await
    }

    async fn extract_all(
        &self,
        selector: &str,
        fields: &[FieldSpec],
    ) -> Result<Vec<RawRecord>, DriverError> {
        self.evaluate(extract_script(selector, fields)?).await
    }

    async fn close(self) -> Result<(), DriverError> {
        self.page.close().await?;
        Ok(())
    }
}

/// Quotes `value` as a JavaScript string literal.
fn js_string(value: &str) -> Result<String, DriverError> {
    serde_json::to_string(value).map_err(|e| DriverError::Evaluation(e.to_string()))
}

fn clear_value_script(selector: &str) -> Result<String, DriverError> {
    Ok(format!(
        r"(() => {{
  const el = document.querySelector({sel});
  if (!el) return false;
  el.focus();
  el.value = '';
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  return true;
}})()",
        sel = js_string(selector)?
    ))
}

/// Builds a script that maps every element matching `selector` to an object
/// keyed by field name.
fn extract_script(selector: &str, fields: &[FieldSpec]) -> Result<String, DriverError> {
    let specs = serde_json::to_string(fields).map_err(|e| DriverError::Evaluation(e.to_string()))?;
    Ok(format!(
        r"(() => {{
  const fields = {specs};
  return Array.from(document.querySelectorAll({sel})).map((root) => {{
    const record = {{}};
    for (const f of fields) {{
      const el = f.selector ? root.querySelector(f.selector) : root;
      let value = null;
      if (el) {{
        if (f.capture.kind === 'text') value = el.textContent;
        else if (f.capture.kind === 'attribute') value = el.getAttribute(f.capture.name);
        else if (f.capture.kind === 'href') value = el.href || el.getAttribute('href');
      }}
      record[f.name] = value == null ? null : String(value).trim();
    }}
    return record;
  }});
}})()",
        sel = js_string(selector)?
    ))
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: String,
}

/// Asks a running browser's DevTools HTTP endpoint for its WebSocket URL.
///
/// # Errors
///
/// Returns [`DriverError::Discovery`] if the endpoint is unreachable, answers
/// with a non-success status, or omits `webSocketDebuggerUrl`.
pub async fn discover_websocket_url(
    debug_url: &str,
    timeout: Duration,
) -> Result<String, DriverError> {
    let version_url = format!("{}/json/version", debug_url.trim_end_matches('/'));
    let fail = |reason: String| DriverError::Discovery {
        url: version_url.clone(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fail(e.to_string()))?;

    let response = client
        .get(&version_url)
        .send()
        .await
        .map_err(|e| fail(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fail(format!("unexpected status {status}")));
    }

    let info: VersionInfo = response.json().await.map_err(|e| fail(e.to_string()))?;
    Ok(info.web_socket_debugger_url)
}
