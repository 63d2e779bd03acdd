mod command;
mod remote;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
