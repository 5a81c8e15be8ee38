//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{HttpItemsClient, ItemsApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                return;
            }
        };

        let client = match HttpItemsClient::new(&server_url) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(%server_url, "invalid server url: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                return;
            }
        };
        tracing::info!(%server_url, "backend worker started");

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let event = handle_command(&client, cmd).await;
                if ui_tx.send(event).is_err() {
                    break;
                }
            }
        });
        tracing::info!("backend worker stopped");
    });
}

async fn handle_command<A: ItemsApi + ?Sized>(api: &A, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::Load => match api.list_items().await {
            Ok(items) => UiEvent::ItemsLoaded(items),
            Err(err) => UiEvent::Error(UiError::from_client(UiErrorContext::Load, &err)),
        },
        BackendCommand::Reorder(request) => match api.reorder(&request).await {
            Ok(response) => UiEvent::ReorderConfirmed(response.items),
            Err(err) => {
                tracing::warn!(moved_item_id = %request.moved_item_id, "reorder failed: {err}");
                UiEvent::ReorderFailed(UiError::from_client(UiErrorContext::Reorder, &err))
            }
        },
    }
}
