use musicdl::{cli, logging};

#[tokio::main]
async fn main() {
    logging::init_logging();
    cli::search::run(std::env::args()).await;
}
