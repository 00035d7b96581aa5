use musicdl::{cli, logging};

#[tokio::main]
async fn main() {
    logging::init_logging();
    cli::resolve::run(std::env::args()).await;
}
