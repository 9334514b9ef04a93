use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    /// A page is in flight, or the last one failed and waits for a retry.
    Fetching,
    /// Every item the server reported has been fetched.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorConfig {
    pub page_size: usize,
    /// How many not-yet-visible items may remain below the viewport before
    /// the next page is requested.
    pub prefetch_gap: usize,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            prefetch_gap: 5,
        }
    }
}

/// A page the cursor wants fetched. `id` tells responses to a cancelled or
/// superseded request apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub id: u64,
    pub offset: usize,
    pub limit: usize,
}

/// Decides when to fetch the next feed page from viewport visibility events.
#[derive(Debug, Clone)]
pub struct PaginationCursor {
    config: CursorConfig,
    /// Server offset of the next page.
    consumed: usize,
    /// Items held in the local cache.
    loaded: usize,
    total: Option<usize>,
    visible: BTreeSet<usize>,
    state: CursorState,
    in_flight: Option<PageRequest>,
    last_error: Option<String>,
    next_request_id: u64,
}

impl PaginationCursor {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            consumed: 0,
            loaded: 0,
            total: None,
            visible: BTreeSet::new(),
            state: CursorState::Idle,
            in_flight: None,
            last_error: None,
            next_request_id: 0,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn config(&self) -> CursorConfig {
        self.config
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Server-reported total, once the first page has arrived.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn max_visible(&self) -> Option<usize> {
        self.visible.last().copied()
    }

    /// Whether a response to `request` should still be applied.
    pub fn is_current(&self, request: PageRequest) -> bool {
        self.in_flight == Some(request)
    }

    /// Request the first page. Does nothing once the feed has started.
    pub fn start(&mut self) -> Option<PageRequest> {
        if self.total.is_some() || self.state != CursorState::Idle {
            return None;
        }
        Some(self.issue())
    }

    pub fn item_visible(&mut self, index: usize) -> Option<PageRequest> {
        self.visible.insert(index);
        self.poll()
    }

    pub fn item_hidden(&mut self, index: usize) -> Option<PageRequest> {
        self.visible.remove(&index);
        self.poll()
    }

    /// Record a page response. `received` is the page length as sent by the
    /// server, `appended` how many of those were new to the cache.
    pub fn page_loaded(
        &mut self,
        request: PageRequest,
        received: usize,
        appended: usize,
        total: usize,
    ) -> Option<PageRequest> {
        if !self.is_current(request) {
            return None;
        }
        self.in_flight = None;
        self.last_error = None;
        self.total = Some(total);
        self.consumed += received;
        self.loaded += appended;

        // An empty page while the total says otherwise means the list shrank
        // under us; stop rather than spin.
        if received == 0 || self.consumed >= total {
            self.state = CursorState::Exhausted;
            return None;
        }
        self.state = CursorState::Idle;
        self.poll()
    }

    /// Record a failed fetch. The cursor stays `Fetching` with the error
    /// kept until [`retry`](Self::retry) or [`cancel`](Self::cancel).
    pub fn page_failed(&mut self, request: PageRequest, error: impl Into<String>) {
        if !self.is_current(request) {
            return;
        }
        self.in_flight = None;
        self.last_error = Some(error.into());
    }

    /// Re-issue the page that failed.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.state != CursorState::Fetching || self.in_flight.is_some() {
            return None;
        }
        self.last_error = None;
        Some(self.issue())
    }

    /// Abandon the current fetch and go back to `Idle` without re-issuing.
    /// Returns the request that was in flight, if any.
    pub fn cancel(&mut self) -> Option<PageRequest> {
        if self.state != CursorState::Fetching {
            return None;
        }
        self.state = CursorState::Idle;
        self.last_error = None;
        self.in_flight.take()
    }

    /// A post was created locally and put at the front of the cache.
    ///
    /// With a page in flight the server may answer from either side of the
    /// insert. The offset is left alone then: if the page already saw the new
    /// post it lines up, otherwise the next page repeats one item that the
    /// cache drops as a duplicate.
    pub fn item_inserted_front(&mut self) {
        if self.in_flight.is_none() {
            self.consumed += 1;
        }
        self.loaded += 1;
        if let Some(total) = self.total.as_mut() {
            *total += 1;
        }
        self.visible = self.visible.iter().map(|i| i + 1).collect();
    }

    /// The cached post at `index` was removed locally.
    ///
    /// A page in flight may have been served after the removal, which would
    /// leave a one-item gap no overlap check can see. That request is
    /// superseded and the page re-issued one item earlier.
    pub fn item_removed(&mut self, index: usize) -> Option<PageRequest> {
        self.consumed = self.consumed.saturating_sub(1);
        self.loaded = self.loaded.saturating_sub(1);
        if let Some(total) = self.total.as_mut() {
            *total = total.saturating_sub(1);
        }
        self.visible = self
            .visible
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();

        self.in_flight.take().map(|_| self.issue())
    }

    fn poll(&mut self) -> Option<PageRequest> {
        if self.state != CursorState::Idle {
            return None;
        }
        let total = self.total?;
        if total <= self.consumed {
            return None;
        }

        let near_end = match self.loaded.checked_sub(1) {
            None => true,
            Some(highest) => self
                .max_visible()
                .is_some_and(|max| highest.saturating_sub(max) <= self.config.prefetch_gap),
        };
        near_end.then(|| self.issue())
    }

    fn issue(&mut self) -> PageRequest {
        let remaining = self
            .total
            .map_or(self.config.page_size, |total| total.saturating_sub(self.consumed));
        let request = PageRequest {
            id: self.next_request_id,
            offset: self.consumed,
            limit: self.config.page_size.min(remaining).max(1),
        };
        self.next_request_id += 1;
        self.state = CursorState::Fetching;
        self.in_flight = Some(request);
        request
    }
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self::new(CursorConfig::default())
    }
}
