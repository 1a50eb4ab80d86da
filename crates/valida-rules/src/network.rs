//! Network address and URL rules.
//!
//! IP parsing uses the standard library's address types; hostname, MAC, and
//! URL shapes are regex checks compiled at registration time.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use regex::Regex;
use valida::{Context, Registry, RuleError, RuleResult};

const HOSTNAME_PATTERN: &str = r"^[a-zA-Z0-9]([a-zA-Z0-9-.]{0,61}[a-zA-Z0-9])?$";

/// Register the network rules into `registry`.
pub fn register(registry: &mut Registry) {
    registry.register("ip", |ctx: &Context<'_>| {
        check(ctx.value().display().parse::<IpAddr>().is_ok())
    });

    registry.register("ipv4", |ctx: &Context<'_>| {
        check(ctx.value().display().parse::<Ipv4Addr>().is_ok())
    });

    registry.register("ipv6", |ctx: &Context<'_>| {
        check(ctx.value().display().parse::<Ipv6Addr>().is_ok())
    });

    registry.register("cidr", |ctx: &Context<'_>| {
        check(parse_cidr(&ctx.value().display()))
    });

    registry.register(
        "mac",
        pattern_rule(r"^([0-9a-fA-F]{2}[:-]){5}[0-9a-fA-F]{2}$", "mac"),
    );

    registry.register("hostname", pattern_rule(HOSTNAME_PATTERN, "hostname"));

    let hostname_re = Regex::new(HOSTNAME_PATTERN).expect("hostname pattern");
    registry.register("fqdn", {
        let hostname_re = hostname_re.clone();
        move |ctx: &Context<'_>| {
            let s = ctx.value().display();
            let Some(prefix) = s.strip_suffix('.') else {
                return Err(RuleError::CheckFailed);
            };
            check(hostname_re.is_match(prefix))
        }
    });

    registry.register("hostname_port", {
        move |ctx: &Context<'_>| {
            let s = ctx.value().display();
            let Some((host, port)) = split_host_port(&s) else {
                return Err(RuleError::CheckFailed);
            };
            if !valid_port(port) {
                return Err(RuleError::CheckFailed);
            }
            let host_ok =
                host.parse::<IpAddr>().is_ok() || hostname_re.is_match(host);
            check(host_ok)
        }
    });

    registry.register("port", |ctx: &Context<'_>| {
        match ctx.value().int() {
            Ok(port) => check((1..=65535).contains(&port)),
            Err(_) => Err(RuleError::CheckFailed),
        }
    });

    registry.register("url", pattern_rule(r"^https?://\S+$", "url"));
    registry.register("http_url", pattern_rule(r"^https?://\S+$", "http_url"));
    registry.register("https_url", pattern_rule(r"^https://\S+$", "https_url"));
}

fn check(ok: bool) -> RuleResult {
    if ok {
        Ok(())
    } else {
        Err(RuleError::CheckFailed)
    }
}

fn pattern_rule(
    pattern: &str,
    name: &str,
) -> impl Fn(&Context<'_>) -> RuleResult + Clone {
    let re = Regex::new(pattern).unwrap_or_else(|e| panic!("invalid {name} pattern: {e}"));
    move |ctx: &Context<'_>| check(re.is_match(&ctx.value().display()))
}

/// `a.b.c.d/len` or `v6/len`, with the prefix length bounded by the family.
fn parse_cidr(s: &str) -> bool {
    let Some((addr, prefix)) = s.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => prefix <= 32,
        Ok(IpAddr::V6(_)) => prefix <= 128,
        Err(_) => false,
    }
}

/// Split `host:port`, honoring `[v6]:port` bracket syntax.
fn split_host_port(s: &str) -> Option<(&str, &str)> {
    if let Some(rest) = s.strip_prefix('[') {
        let (host, rest) = rest.split_once(']')?;
        let port = rest.strip_prefix(':')?;
        return Some((host, port));
    }
    let (host, port) = s.rsplit_once(':')?;
    if host.contains(':') {
        // Unbracketed v6 address; ambiguous.
        return None;
    }
    Some((host, port))
}

fn valid_port(s: &str) -> bool {
    matches!(s.parse::<u32>(), Ok(p) if (1..=65535).contains(&p))
}
