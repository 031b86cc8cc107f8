use clap::Parser;
use mtu::loader::ProgramLoader;
use mtu::machine::Machine;
use mtu::types::Step;
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The MTU program file to execute
    #[clap(short, long)]
    program: String,

    /// The initial tape contents
    #[clap(short, long, default_value = "")]
    input: String,

    /// Maximum number of steps before giving up
    #[clap(short = 'm', long, default_value_t = 10_000)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let program = match ProgramLoader::load_program(Path::new(&cli.program)) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.debug {
        for warning in mtu::analyzer::warnings(&program) {
            eprintln!("warning: {warning:?}");
        }
    }

    let mut machine = Machine::new();
    machine.load_program(program);
    machine.set_input(&cli.input);
    machine.reset();

    let print_state = |machine: &Machine| {
        println!(
            "Step: {}, State: {}, Tape: {}, Pointer: {}",
            machine.step_count(),
            machine.state(),
            machine.tape(),
            machine.tape().pointer()
        );
    };

    if cli.debug {
        print_state(&machine);
    }

    let mut exit = ExitCode::SUCCESS;
    for _ in 0..cli.max_steps {
        let step = machine.step();

        if cli.debug {
            print_state(&machine);
            if let Some(instruction) = machine.last_instruction() {
                println!("  applied: {instruction}");
            }
        }

        match step {
            Step::Stepped(_) | Step::SteppedWhileSkip(_) => continue,
            Step::Accepted(_) => {
                println!("Accepted in state {}.", machine.state());
                break;
            }
            Step::NoMatch => {
                println!("No matching instruction; halted in state {}.", machine.state());
                break;
            }
            Step::Error(e) => {
                eprintln!("Machine error: {e}");
                exit = ExitCode::FAILURE;
                break;
            }
        }
    }

    println!("{}", machine.tape());
    exit
}
