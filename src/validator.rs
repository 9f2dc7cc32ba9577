//! Domain liveness validation.
//!
//! A candidate counts as valid when ANY configured signal succeeds: a
//! domain with nothing but a TXT record still lands on the block-list.
//! Which signals run, and in what order, comes from the config rather than
//! being baked in here.

use anyhow::{Context, Result};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::{Resolver, TokioResolver};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::config::ValidationConfig;

/// One piece of evidence that a domain is live or registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// NS record lookup
    Ns,
    /// PTR record lookup
    Ptr,
    /// A/AAAA record lookup
    Ip,
    /// CNAME record lookup
    Cname,
    /// MX record lookup
    Mx,
    /// TXT record lookup
    Txt,
    /// System resolver host lookup
    Host,
    /// RDAP registration record
    Rdap,
    /// Raw TCP connect on ports 80/443
    Tcp,
    /// HTTP/HTTPS response
    Http,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Ns => "ns",
            Signal::Ptr => "ptr",
            Signal::Ip => "ip",
            Signal::Cname => "cname",
            Signal::Mx => "mx",
            Signal::Txt => "txt",
            Signal::Host => "host",
            Signal::Rdap => "rdap",
            Signal::Tcp => "tcp",
            Signal::Http => "http",
        }
    }
}

/// Outcome of validating one candidate domain.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub valid: bool,
    /// The first signal that succeeded, when any did.
    pub signal: Option<Signal>,
}

/// Checks candidate domains against the configured signal set.
pub struct Validator {
    resolver: TokioResolver,
    http: Client,
    signals: Vec<Signal>,
    per_signal_timeout: Duration,
}

impl Validator {
    pub fn new(config: &ValidationConfig) -> Result<Self> {
        let per_signal_timeout = Duration::from_secs(config.timeout_secs);

        let mut opts = ResolverOpts::default();
        opts.timeout = per_signal_timeout;
        opts.attempts = 1;
        let resolver = Resolver::builder_with_config(
            ResolverConfig::google(),
            TokioConnectionProvider::default(),
        )
        .with_options(opts)
        .build();

        let http = Client::builder()
            .timeout(per_signal_timeout)
            .user_agent(format!("hostsmith/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create validation HTTP client")?;

        let mut signals = config.signals.clone();
        if config.connect_probes {
            for probe in [Signal::Tcp, Signal::Http] {
                if !signals.contains(&probe) {
                    signals.push(probe);
                }
            }
        }

        Ok(Self {
            resolver,
            http,
            signals,
            per_signal_timeout,
        })
    }

    /// Try the configured signals in order until one succeeds.
    ///
    /// Each signal is bounded by its own timeout, so a hanging lookup for
    /// one candidate cannot stall the run; total time per domain is capped
    /// by the sum of per-signal timeouts.
    pub async fn validate(&self, domain: &str) -> Verdict {
        for signal in &self.signals {
            if self.check(*signal, domain).await {
                debug!("Valid domain: {} ({})", domain, signal.as_str());
                return Verdict {
                    valid: true,
                    signal: Some(*signal),
                };
            }
        }
        debug!("No validation signal for: {}", domain);
        Verdict {
            valid: false,
            signal: None,
        }
    }

    async fn check(&self, signal: Signal, domain: &str) -> bool {
        let bounded = timeout(self.per_signal_timeout, async {
            match signal {
                Signal::Ns => self.lookup_records(domain, RecordType::NS).await,
                Signal::Ptr => self.lookup_records(domain, RecordType::PTR).await,
                Signal::Ip => self.lookup_ip(domain).await,
                Signal::Cname => self.lookup_records(domain, RecordType::CNAME).await,
                Signal::Mx => self.lookup_records(domain, RecordType::MX).await,
                Signal::Txt => self.lookup_records(domain, RecordType::TXT).await,
                Signal::Host => self.lookup_host(domain).await,
                Signal::Rdap => self.rdap_registered(domain).await,
                Signal::Tcp => self.tcp_connect(domain).await,
                Signal::Http => self.http_probe(domain).await,
            }
        });
        bounded.await.unwrap_or(false)
    }

    async fn lookup_records(&self, domain: &str, record_type: RecordType) -> bool {
        match self.resolver.lookup(domain, record_type).await {
            Ok(lookup) => lookup.records().iter().next().is_some(),
            Err(_) => false,
        }
    }

    async fn lookup_ip(&self, domain: &str) -> bool {
        match self.resolver.lookup_ip(domain).await {
            Ok(lookup) => lookup.iter().next().is_some(),
            Err(_) => false,
        }
    }

    /// System resolver lookup on a blocking thread, same shape as the
    /// other signals from the caller's point of view.
    async fn lookup_host(&self, domain: &str) -> bool {
        let name = domain.to_string();
        match tokio::task::spawn_blocking(move || dns_lookup::lookup_host(&name)).await {
            Ok(Ok(addrs)) => !addrs.is_empty(),
            _ => false,
        }
    }

    /// Registration check against the RDAP bootstrap service: a 2xx answer
    /// means some registry knows the domain.
    async fn rdap_registered(&self, domain: &str) -> bool {
        let url = format!("https://rdap.org/domain/{}", domain);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn tcp_connect(&self, domain: &str) -> bool {
        for port in [80u16, 443] {
            if TcpStream::connect((domain, port)).await.is_ok() {
                return true;
            }
        }
        false
    }

    async fn http_probe(&self, domain: &str) -> bool {
        for scheme in ["http", "https"] {
            let url = format!("{}://{}", scheme, domain);
            if self.http.get(&url).send().await.is_ok() {
                return true;
            }
        }
        false
    }
}
