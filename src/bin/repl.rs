use sexpr::{cmdline, interpreter, Scope};

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();
    let scope = Scope::new();
    let interface = cmdline::setup()?;
    cmdline::repl(&interface, |line| interpreter::rep(line, &scope));
    cmdline::save_history(&interface)?;
    Ok(())
}
