pub(crate) mod client;
pub(crate) mod parser;

pub(crate) use client::{spawn_host, Endpoint, HostBridge, HostProcess, PostRequest, StdioBridge};
pub(crate) use parser::{
    parse_host_line, HostCommand, HostMessage, HostResponse, ProgressStartRequest,
    SelectionReport, ShowDialogRequest, BACK_ACTION, CANCEL_INDEX, SELECT_OPTION_PATH,
};
