use clap::Subcommand;
use loglens_sdk::QueryClient;

#[derive(Subcommand)]
pub enum StreamAction {
    /// List the log streams on the server
    List,
}

impl StreamAction {
    pub async fn run(self, client: &QueryClient) -> anyhow::Result<()> {
        match self {
            StreamAction::List => {
                let streams = client.list_streams().await?;
                for stream in streams {
                    println!("{}", stream.name);
                }
            }
        }
        Ok(())
    }
}
