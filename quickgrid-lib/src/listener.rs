//! Change notification

use tokio::sync::mpsc;

use crate::query::GridQuery;

/// Receives a fresh snapshot every time a grid's filters or sort change.
///
/// The grid calls [`on_change`](Self::on_change) synchronously and does not
/// wait for any work the listener starts. Closures taking a [`GridQuery`]
/// implement this trait.
pub trait ChangeListener<T> {
    fn on_change(&mut self, query: GridQuery<T>);
}

impl<T, F> ChangeListener<T> for F
where
    F: FnMut(GridQuery<T>),
{
    fn on_change(&mut self, query: GridQuery<T>) {
        self(query)
    }
}

/// Forwards snapshots over an unbounded tokio channel.
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::{Column, ValueKind};
/// use quickgrid_lib::{ChannelListener, Grid};
///
/// struct Row {
///     id: i32,
/// }
///
/// let (listener, mut rx) = ChannelListener::<Row>::new();
/// let mut grid = Grid::new().with_listener(listener);
/// grid.register_column(Column::property("Id", ValueKind::Integer, |r: &Row| r.id).sortable())?;
/// grid.toggle_sort("Id")?;
///
/// let snapshot = rx.try_recv().unwrap();
/// assert_eq!(snapshot.sort_chain().len(), 1);
/// # Ok::<(), quickgrid_lib::error::GridError>(())
/// ```
pub struct ChannelListener<T> {
    tx: mpsc::UnboundedSender<GridQuery<T>>,
}

impl<T> ChannelListener<T> {
    /// Creates a listener and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GridQuery<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Creates a listener sending into an existing channel.
    pub fn from_sender(tx: mpsc::UnboundedSender<GridQuery<T>>) -> Self {
        Self { tx }
    }
}

impl<T> ChangeListener<T> for ChannelListener<T> {
    fn on_change(&mut self, query: GridQuery<T>) {
        if self.tx.send(query).is_err() {
            log::warn!("Change listener channel closed, snapshot dropped");
        }
    }
}
