use anyhow::bail;

/// Deployment convention the app runs under.
///
/// Vercel and the older Now/ZEIT platform inject the same kind of header
/// carrying the externally reachable URL of the current deployment; only the
/// header name and the user-facing copy differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployTarget {
    Vercel,
    Now,
}

impl DeployTarget {
    const fn as_str(&self) -> &'static str {
        match self {
            DeployTarget::Vercel => "vercel",
            DeployTarget::Now => "now",
        }
    }

    /// Request header that carries the public deployment URL.
    pub const fn header_name(&self) -> &'static str {
        match self {
            DeployTarget::Vercel => "x-vercel-deployment-url",
            DeployTarget::Now => "x-now-deployment-url",
        }
    }

    /// Platform name used in page copy.
    pub const fn platform_name(&self) -> &'static str {
        match self {
            DeployTarget::Vercel => "Vercel",
            DeployTarget::Now => "Now",
        }
    }
}

impl std::str::FromStr for DeployTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vercel" => Ok(DeployTarget::Vercel),
            "now" => Ok(DeployTarget::Now),
            _ => bail!("unknown deploy target: {}", s),
        }
    }
}

impl std::fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
