use dylib_trampoline::{Config, DefaultLoader, ErrorSink, InvocationRequest, Trampoline};
use std::{env, io, process::ExitCode};

fn main() -> ExitCode {
    #[cfg(feature = "log")]
    env_logger::init();

    let request = match InvocationRequest::parse(env::args_os()) {
        Ok(request) => request,
        Err(err) => return exit_code(err.exit_code()),
    };

    let trampoline = Trampoline::<DefaultLoader>::new();
    match unsafe { trampoline.run(&request, &mut io::stdout()) } {
        Ok(_report) => {
            #[cfg(feature = "log")]
            log::debug!("{:?}", _report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(text) = err.diagnostic() {
                ErrorSink::from_config(&Config::from_env()).report(text);
            }
            exit_code(err.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}
