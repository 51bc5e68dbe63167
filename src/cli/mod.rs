use tracing_subscriber::EnvFilter;
use url::Url;

use faunalist::deploy::DeployTarget;

#[derive(clap::Parser)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: Cmd,
}

impl Args {
    pub fn run(self) {
        match self.cmd {
            Cmd::Serve(cmd) => cmd.run().unwrap(),
        }
    }
}

#[derive(clap::Subcommand)]
pub enum Cmd {
    Serve(CmdServe),
}

#[derive(clap::Parser)]
pub struct CmdServe {
    #[clap(long, env = "PORT", default_value_t = faunalist::server::DEFAULT_PORT)]
    port: u16,

    /// Secret used to authenticate against the FaunaDB API.
    ///
    /// May be left unset: the app still serves, but the collections
    /// endpoint reports a configuration error.
    #[clap(long, env = "FAUNADB_SECRET")]
    fauna_secret: Option<String>,

    /// Base URL of the FaunaDB HTTP API.
    #[clap(long, env = "FAUNADB_ENDPOINT", default_value = "https://db.fauna.com")]
    fauna_endpoint: Url,

    /// Deployment platform whose header carries the public deployment URL.
    #[clap(long, env = "DEPLOY_TARGET", default_value_t = DeployTarget::Vercel)]
    deploy_target: DeployTarget,
}

impl CmdServe {
    #[tokio::main]
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let filter = EnvFilter::try_from_default_env().unwrap_or("info".parse().unwrap());
        tracing_subscriber::fmt().with_env_filter(filter).init();

        faunalist::server::CtxBuilder::new()
            .fauna_secret(self.fauna_secret)
            .fauna_endpoint(self.fauna_endpoint)
            .deploy_target(self.deploy_target)
            .build()?
            .run_server(self.port)
            .await?;

        Ok(())
    }
}
