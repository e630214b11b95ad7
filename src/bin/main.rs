use cl_events::{
    Event, 
    EventBase, 
    EventExt, 
    EventPriority, 
    ListenerFlags, 
    RegistryConfig
};
use cl_log::{level::Level, write_options::WriteOptions, Logger};
use log::{error, info};

struct PlayerChatEvent {
    base: EventBase,
    player: String,
    message: String,
}

cl_events::impl_event!(PlayerChatEvent, cancellable);

struct ServerTickEvent {
    base: EventBase,
    tick: u64,
}

cl_events::impl_event!(ServerTickEvent);

fn register_plugins() {
    let chat = cl_events::registry().slot_for::<PlayerChatEvent>();

    // Censor plugin: vetoes visibly.
    chat.register(EventPriority::Low, ListenerFlags::empty(), |event| {
        info!("censor vetoing {}", event.event_name());
        event.cancel()
    });

    // Mute plugin: guarantees the veto without telling peers.
    chat.register(EventPriority::Normal, ListenerFlags::empty(), |event| {
        event.finally_cancel()
    });

    // Appeal plugin: overrides the censor's visible veto.
    chat.register(EventPriority::High, ListenerFlags::empty(), |event| {
        event.set_cancelled(false)
    });

    // Logging plugin: only sees messages nobody has vetoed visibly.
    chat.register(EventPriority::Monitor, ListenerFlags::IGNORE_CANCELLED, |event| {
        info!("monitor sees {} (cancelled: {})", event.event_name(), event.is_cancelled()?);
        Ok(())
    });

    let tick = cl_events::registry().slot_for::<ServerTickEvent>();
    tick.register(EventPriority::Normal, ListenerFlags::empty(), |event| {
        info!("tick listener running for {}", event.event_name());
        Ok(())
    });
}

fn main() -> cl_events::Result<()> {

    let opt = Some(WriteOptions::EXPANDED);
    let err_opt = Some(WriteOptions::ALL);

    match Logger::builder()
        .with_stderr(Level::Error, err_opt)
        .with_stdout(Level::Warn, opt)
        .with_stdout(Level::Info, opt)
        .with_stdout(Level::Debug, opt)
        .with_stdout(Level::Trace, opt)
    .build() {
        Ok(_) => {},
        Err(err) => {
            eprintln!("Failed to initialize logger: {}", err);
            std::process::exit(1);
        }
    }

    cl_events::init(RegistryConfig { capacity: 16, shard_amount: 4 })?;
    register_plugins();

    let mut chat = PlayerChatEvent {
        base: EventBase::new(),
        player: String::from("steve"),
        message: String::from("hello"),
    };

    let cancelled = cl_events::call_event(&mut chat)?;
    info!(
        "{} from {} ({}): cancelled = {}", 
        chat.event_name(), 
        chat.player, 
        chat.message, 
        cancelled
    );

    let mut tick = ServerTickEvent {
        base: EventBase::named("server tick"),
        tick: 1,
    };
    cl_events::call_event(&mut tick)?;

    if let Err(err) = tick.cancel() {
        error!("tick {}: {}", tick.tick, err);
    }

    info!(
        "{} event types registered", 
        cl_events::registry().len()
    );

    Ok(())

}
