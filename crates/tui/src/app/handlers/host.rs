use crate::app::runtime::{parse_host_line, HostBridge, HostMessage};
use crate::app::DialogController;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;
use tracing::{debug, info};

const MAX_HOST_LINES_PER_TICK: usize = 300;

pub fn handle_host_message<B: HostBridge>(
    controller: &mut DialogController<B>,
    message: HostMessage,
    now: Instant,
) {
    match message {
        HostMessage::Command(command) => controller.handle_command(command, now),
        HostMessage::UnknownAction(action) => debug!(%action, "ignoring unknown host action"),
        HostMessage::Response(response) => controller.handle_response(response),
        HostMessage::Output(line) => info!(target: "host", "{line}"),
    }
}

/// Drains queued host lines. Returns `false` once the host side has hung up.
pub fn process_host_messages<B: HostBridge>(
    controller: &mut DialogController<B>,
    rx: &Receiver<String>,
) -> bool {
    let mut processed = 0usize;
    while processed < MAX_HOST_LINES_PER_TICK {
        match rx.try_recv() {
            Ok(line) => {
                processed += 1;
                handle_host_message(controller, parse_host_line(&line), Instant::now());
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
    if processed == MAX_HOST_LINES_PER_TICK {
        // Yield to input and drawing; the rest waits for the next tick.
        controller.request_redraw();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::runtime::Endpoint;
    use crate::app::test_support::RecordingBridge;
    use pretty_assertions::assert_eq;
    use std::sync::mpsc;

    fn controller() -> DialogController<RecordingBridge> {
        DialogController::new(
            RecordingBridge::default(),
            Endpoint::for_resource("simple-dialogs"),
        )
    }

    #[test]
    fn commands_flow_from_channel_to_state() {
        let (tx, rx) = mpsc::channel();
        let show = r#"{"action":"showDialog","data":{"speaker":"Bob","options":[{"label":"Y"}]}}"#;
        tx.send(show.to_string()).unwrap();
        tx.send("plain host log line".to_string()).unwrap();
        tx.send(r#"{"action":"spin"}"#.to_string()).unwrap();

        let mut controller = controller();
        assert!(process_host_messages(&mut controller, &rx));

        let dialog = controller.current_dialog().cloned().unwrap();
        assert_eq!(dialog.speaker, "Bob");
        assert_eq!(dialog.options.len(), 1);

        tx.send(r#"{"action":"closeDialog"}"#.to_string()).unwrap();
        drop(tx);
        assert!(!process_host_messages(&mut controller, &rx));
        assert!(controller.current_dialog().is_none());
    }

    #[test]
    fn heavy_traffic_is_split_across_ticks() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..(MAX_HOST_LINES_PER_TICK + 5) {
            tx.send(r#"{"action":"progressEnd"}"#.to_string()).unwrap();
        }
        let mut controller = controller();
        controller.take_redraw();

        assert!(process_host_messages(&mut controller, &rx));
        assert!(controller.take_redraw());
        assert_eq!(rx.try_iter().count(), 5);
    }
}
