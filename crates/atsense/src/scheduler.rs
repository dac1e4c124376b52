/*!
Timer implementations.

- [`ManualScheduler`] - a virtual clock. Nothing fires until the owner calls
  [`ManualScheduler::advance`]. Deterministic; used by tests and by hosts
  that drive time from their own frame loop.
- [`ThreadScheduler`] - real time. One background thread sleeps until the
  earliest deadline. Stops and joins on drop.

Both run tasks without holding their own lock, so a task may schedule or
cancel further timers.
*/

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::platform::{Scheduler, Task};
use crate::types::TimerId;

/// Queue key: deadline, then scheduling order for equal deadlines.
type Slot<T> = (T, u64);

/// Deadline-ordered task queue shared by both schedulers.
struct TimerQueue<T: Ord + Copy> {
  seq: u64,
  tasks: BTreeMap<Slot<T>, (TimerId, Task)>,
  slots: HashMap<TimerId, Slot<T>>,
}

impl<T: Ord + Copy> TimerQueue<T> {
  fn new() -> Self {
    Self {
      seq: 0,
      tasks: BTreeMap::new(),
      slots: HashMap::new(),
    }
  }

  fn push(&mut self, deadline: T, task: Task) -> TimerId {
    let id = TimerId::next();
    let slot = (deadline, self.seq);
    self.seq += 1;
    self.tasks.insert(slot, (id, task));
    self.slots.insert(id, slot);
    id
  }

  fn cancel(&mut self, id: TimerId) -> bool {
    match self.slots.remove(&id) {
      Some(slot) => self.tasks.remove(&slot).is_some(),
      None => false,
    }
  }

  fn next_deadline(&self) -> Option<T> {
    self.tasks.keys().next().map(|(deadline, _)| *deadline)
  }

  /// Pop the earliest task if its deadline is at or before `now`.
  fn pop_due(&mut self, now: T) -> Option<(T, Task)> {
    let (&slot, _) = self.tasks.iter().next()?;
    if slot.0 > now {
      return None;
    }
    let (id, task) = self.tasks.remove(&slot)?;
    self.slots.remove(&id);
    Some((slot.0, task))
  }

  fn len(&self) -> usize {
    self.tasks.len()
  }
}

/// A deadline past the end of the clock is never reached, so the task is dropped.
/// The returned id is valid to cancel and matches nothing.
fn unreachable_timer(delay: Duration) -> TimerId {
  log::debug!("[scheduler] delay of {delay:?} is past the end of the clock, timer will never fire");
  TimerId::next()
}

// === Manual ===

struct ManualClock {
  now: Duration,
  queue: TimerQueue<Duration>,
}

/// Virtual clock scheduler.
///
/// Clone is cheap (Arc bump); clones share the same clock.
///
/// ```
/// use atsense::{ManualScheduler, Scheduler};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
/// clock.schedule(Duration::from_secs(1), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// clock.advance(Duration::from_millis(999));
/// assert!(!fired.load(Ordering::SeqCst));
/// clock.advance(Duration::from_millis(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Clone)]
pub struct ManualScheduler {
  clock: Arc<Mutex<ManualClock>>,
}

impl std::fmt::Debug for ManualScheduler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let clock = self.clock.lock();
    f.debug_struct("ManualScheduler")
      .field("now", &clock.now)
      .field("pending", &clock.queue.len())
      .finish()
  }
}

impl Default for ManualScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl ManualScheduler {
  pub fn new() -> Self {
    Self {
      clock: Arc::new(Mutex::new(ManualClock {
        now: Duration::ZERO,
        queue: TimerQueue::new(),
      })),
    }
  }

  /// Virtual time elapsed since creation.
  pub fn now(&self) -> Duration {
    self.clock.lock().now
  }

  /// Number of timers waiting to fire.
  pub fn pending(&self) -> usize {
    self.clock.lock().queue.len()
  }

  /// Move the clock forward, firing every timer that comes due in deadline order.
  ///
  /// Timers scheduled by a firing task are honoured if they fall inside the same span.
  pub fn advance(&self, by: Duration) {
    let target = self.clock.lock().now.saturating_add(by);
    loop {
      let due = {
        let mut clock = self.clock.lock();
        match clock.queue.pop_due(target) {
          Some((deadline, task)) => {
            clock.now = deadline;
            Some(task)
          }
          None => {
            clock.now = target;
            None
          }
        }
      };
      match due {
        Some(task) => task(),
        None => break,
      }
    }
  }

  /// Convenience for `advance(Duration::from_secs_f64(secs))`.
  pub fn advance_secs(&self, secs: f64) {
    self.advance(Duration::from_secs_f64(secs));
  }
}

impl Scheduler for ManualScheduler {
  fn schedule(&self, delay: Duration, task: Task) -> TimerId {
    let mut clock = self.clock.lock();
    match clock.now.checked_add(delay) {
      Some(deadline) => clock.queue.push(deadline, task),
      None => unreachable_timer(delay),
    }
  }

  fn cancel(&self, id: TimerId) {
    self.clock.lock().queue.cancel(id);
  }
}

// === Thread ===

struct ThreadShared {
  queue: Mutex<TimerQueue<Instant>>,
  wake: Condvar,
  stop_signal: AtomicBool,
}

/// Real-time scheduler backed by one timer thread. Stops on drop.
pub struct ThreadScheduler {
  shared: Arc<ThreadShared>,
  thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ThreadScheduler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ThreadScheduler")
      .field("pending", &self.shared.queue.lock().len())
      .finish_non_exhaustive()
  }
}

impl Default for ThreadScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl ThreadScheduler {
  /// Start the timer thread.
  pub fn new() -> Self {
    let shared = Arc::new(ThreadShared {
      queue: Mutex::new(TimerQueue::new()),
      wake: Condvar::new(),
      stop_signal: AtomicBool::new(false),
    });
    let shared_clone = Arc::clone(&shared);

    let thread = thread::Builder::new()
      .name("atsense-timers".into())
      .spawn(move || timer_loop(&shared_clone))
      .map_err(|e| log::error!("Failed to spawn timer thread: {e}"))
      .ok();

    Self { shared, thread }
  }
}

fn timer_loop(shared: &ThreadShared) {
  let mut queue = shared.queue.lock();
  while !shared.stop_signal.load(Ordering::SeqCst) {
    if let Some((_, task)) = queue.pop_due(Instant::now()) {
      run_unlocked(&mut queue, task);
      continue;
    }
    match queue.next_deadline() {
      Some(deadline) => {
        shared.wake.wait_until(&mut queue, deadline);
      }
      None => shared.wake.wait(&mut queue),
    }
  }
}

fn run_unlocked(queue: &mut MutexGuard<'_, TimerQueue<Instant>>, task: Task) {
  MutexGuard::unlocked(queue, task);
}

impl Scheduler for ThreadScheduler {
  fn schedule(&self, delay: Duration, task: Task) -> TimerId {
    let Some(deadline) = Instant::now().checked_add(delay) else {
      return unreachable_timer(delay);
    };
    let id = self.shared.queue.lock().push(deadline, task);
    self.shared.wake.notify_one();
    id
  }

  fn cancel(&self, id: TimerId) {
    self.shared.queue.lock().cancel(id);
  }
}

impl Drop for ThreadScheduler {
  fn drop(&mut self) {
    self.shared.stop_signal.store(true, Ordering::SeqCst);
    {
      // Notify while holding the lock so the wakeup cannot slip in before the wait.
      let _queue = self.shared.queue.lock();
      self.shared.wake.notify_all();
    }
    if let Some(t) = self.thread.take() {
      // The last handle may be dropped by a task running on the timer thread itself.
      if t.thread().id() != thread::current().id() {
        drop(t.join());
      }
    }
  }
}
