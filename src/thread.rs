use std::thread;

/// Worker threads which are joined when dropped
#[derive(Debug)]
pub(crate) struct Joiner<T>(Vec<thread::JoinHandle<T>>);

impl<T> Joiner<T> {
    pub(crate) fn new<Gen, ThreadFn>(threads: usize, mut thread_fn: Gen) -> Self
    where
        Gen: FnMut(usize) -> ThreadFn,
        ThreadFn: FnOnce() -> T,
        ThreadFn: Send + 'static,
        T: Send + 'static,
    {
        let mut thread_handles = Vec::with_capacity(threads);
        for i in 0..threads {
            thread_handles.push(thread::spawn(thread_fn(i)));
        }
        Self(thread_handles)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T> Drop for Joiner<T> {
    fn drop(&mut self) {
        for t in self.0.drain(..) {
            let res = t.join();
            if !thread::panicking() {
                if let Err(panic) = res {
                    std::panic::resume_unwind(panic);
                }
            }
        }
    }
}
