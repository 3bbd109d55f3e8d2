use std::env;
use std::process;
use std::sync::Arc;

use packetflow::core::EventLog;
use packetflow::queue::{
    DEFAULT_CONSUMER_COUNT, DEFAULT_ITEM_BUFFER_BYTES, DEFAULT_PRODUCER_COUNT,
    DEFAULT_QUEUE_CAPACITY,
};
use packetflow::{PipelineBuilder, PrintSink, SimSource};

struct Config {
    producers: usize,
    consumers: usize,
    capacity: usize,
    buffer_bytes: usize,
    log_path: String,
}

impl Config {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut config = Config {
            producers: DEFAULT_PRODUCER_COUNT,
            consumers: DEFAULT_CONSUMER_COUNT,
            capacity: DEFAULT_QUEUE_CAPACITY,
            buffer_bytes: DEFAULT_ITEM_BUFFER_BYTES,
            log_path: "system.log".into(),
        };

        for arg in args {
            let Some((key, value)) = arg.split_once('=') else {
                return Err(format!("unrecognized argument: {arg}"));
            };
            match key {
                "producers" => config.producers = parse_count(key, value)?,
                "consumers" => config.consumers = parse_count(key, value)?,
                "capacity" => config.capacity = parse_count(key, value)?,
                "buffer-bytes" => config.buffer_bytes = parse_count(key, value)?,
                "log" => config.log_path = value.to_string(),
                _ => return Err(format!("unrecognized option: {key}")),
            }
        }
        Ok(config)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("{key} must be a positive integer, got {value:?}"))
}

fn main() -> std::io::Result<()> {
    packetflow::trace::init_tracing();

    let config = match Config::parse(env::args().skip(1)) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!(
                "Usage: packetflow [producers=N] [consumers=M] [capacity=C] [buffer-bytes=B] [log=PATH]"
            );
            process::exit(1);
        }
    };

    let events = Arc::new(EventLog::to_file(&config.log_path)?);
    let sink = Arc::new(PrintSink);

    let pipeline = PipelineBuilder::new()
        .with_producers(config.producers)
        .with_consumers(config.consumers)
        .with_queue_capacity(config.capacity)
        .with_item_buffer_bytes(config.buffer_bytes)
        .build(|id| SimSource::new(id as u64 + 1), sink, Arc::clone(&events))?;

    let queue = Arc::clone(pipeline.queue());
    ctrlc::set_handler(move || {
        queue.close();
    })
    .expect("Error setting Ctrl+C handler");

    println!(
        "packetflow: {} producers -> queue({}) -> {} consumers (Ctrl+C to stop)",
        config.producers, config.capacity, config.consumers
    );

    pipeline.join();
    Ok(())
}
