//! Async bridge
//!
//! Rendering is CPU-bound, so the session runs on tokio's blocking pool and
//! hands pages to the async side through a channel of capacity one. At most
//! one finished page waits in the channel while the next is rendered.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::session::Session;
use crate::types::{PageSelection, RenderOptions, RenderedPage};

/// Receiving end of a background render
pub struct PageReceiver {
    rx: mpsc::Receiver<Result<RenderedPage>>,
    task: JoinHandle<()>,
}

impl PageReceiver {
    /// Next page, or `None` once the document is done (or failed)
    pub async fn next(&mut self) -> Option<Result<RenderedPage>> {
        self.rx.recv().await
    }

    /// Stop rendering and wait for the background session to close
    pub async fn cancel(self) {
        let PageReceiver { rx, task } = self;
        drop(rx);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "render task ended abnormally");
        }
    }
}

/// Open with MuPDF on the blocking pool and stream pages back
#[cfg(feature = "mupdf")]
pub fn spawn_render_all_pages(
    input: crate::types::PdfInput<'static>,
    options: crate::convenience::BatchOptions,
) -> PageReceiver {
    let crate::convenience::BatchOptions { open, pages, render } = options;
    spawn_render_all_pages_with(move || Session::open(input, &open), pages, render)
}

/// Run `open` on the blocking pool, then stream the selected pages back
///
/// Open and selection errors arrive as the first (and only) item. Dropping
/// the receiver stops the producer before its next page.
pub fn spawn_render_all_pages_with<F>(
    open: F,
    selection: Option<PageSelection>,
    render: RenderOptions,
) -> PageReceiver
where
    F: FnOnce() -> Result<Session> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    let task = tokio::task::spawn_blocking(move || {
        let session = match open() {
            Ok(session) => session,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        };

        let stream = match session.render_pages(selection.as_ref(), &render) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        };

        for item in stream {
            if tx.blocking_send(item).is_err() {
                tracing::debug!("page receiver dropped, stopping render");
                break;
            }
        }
    });

    PageReceiver { rx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::CodecEncoder;
    use crate::engine::mock::MockEngine;
    use crate::types::{OpenOptions, PageRange};
    use crate::ErrorKind;

    fn opener(engine: MockEngine) -> impl FnOnce() -> Result<Session> + Send + 'static {
        move || {
            Session::open_with(
                &engine,
                Box::new(CodecEncoder::new()),
                b"%PDF-mock".as_slice(),
                &OpenOptions::default(),
            )
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pages_arrive_in_order() {
        let engine = MockEngine::with_pages(4);
        let counters = engine.counters.clone();
        let mut rx = spawn_render_all_pages_with(opener(engine), None, RenderOptions::png(0.05));

        let mut numbers = Vec::new();
        while let Some(page) = rx.next().await {
            numbers.push(page.unwrap().page_number);
        }
        assert_eq!(numbers, vec![1, 2, 3, 4]);

        rx.cancel().await;
        assert_eq!(counters.releases(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_selection_error_is_first_item() {
        let engine = MockEngine::with_pages(2);
        let mut rx = spawn_render_all_pages_with(
            opener(engine),
            Some(PageRange::new(1, 3).into()),
            RenderOptions::png(0.05),
        );

        let err = rx.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPageNumber);
        assert!(rx.next().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_closes_session() {
        let engine = MockEngine::with_pages(50);
        let counters = engine.counters.clone();
        let mut rx = spawn_render_all_pages_with(opener(engine), None, RenderOptions::png(0.05));

        rx.next().await.unwrap().unwrap();
        rx.cancel().await;

        assert_eq!(counters.releases(), 1);
        // one delivered, at most one queued, at most one in flight when the send failed
        assert!(counters.rasterizations() <= 3);
    }
}
