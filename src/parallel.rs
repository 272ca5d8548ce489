use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex };

use log::{ debug, error, info };

use crate::color::Color;
use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::error::{ Error, Result };

pub enum Message {
    Row(usize),
    Terminate,
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, world: Arc<World>, camera: Camera,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>,
        results: mpsc::Sender<(usize, Vec<Color>)>) -> Worker {

        let thread = thread::spawn(move || loop {
            // Obtain the next message; a poisoned or closed queue means the
            // pool is going away.
            let message = match receiver.lock() {
                Ok(rx) => rx.recv(),
                Err(_) => break,
            };

            match message {
                Ok(Message::Row(y)) => {
                    // Shade a whole row and hand it back to the dispatcher.
                    let row = camera.render_row(&world, y);
                    if results.send((y, row)).is_err() {
                        break;
                    }
                    debug!("Worker {} finished row {}.", id, y);
                },

                Ok(Message::Terminate) | Err(_) => {
                    // Exit the worker thread loop, terminating the thread.
                    break;
                }
            }
        });

        Worker { id, thread: Some(thread) }
    }
}

/// A fixed pool of threads shading rows of one world.
///
/// The world is shared read-only between the workers. Finished rows travel
/// back over a channel, so only the dispatching thread ever touches the
/// canvas.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    pub fn new(size: usize, world: World, camera: Camera,
        results: mpsc::Sender<(usize, Vec<Color>)>) -> ThreadPool {
        // There should be at least one thread to run workers.
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();

        let world = Arc::new(world);
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(
                id,
                Arc::clone(&world),
                camera,
                Arc::clone(&receiver),
                results.clone(),
            ));
        }

        ThreadPool { workers, sender }
    }

    pub fn execute(&mut self, message: Message) {
        // Only fails once every worker has exited; `shutdown` reports why.
        let _ = self.sender.send(message);
    }

    /// Stops every worker once the queued rows are done.
    ///
    /// Returns the ids of workers which panicked.
    pub fn shutdown(&mut self) -> Vec<usize> {
        for _ in &self.workers {
            let _ = self.sender.send(Message::Terminate);
        }

        let mut panicked = Vec::new();
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    error!("Worker {} panicked.", worker.id);
                    panicked.push(worker.id);
                }
            }
        }

        panicked
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Renders the world row by row on `threads` worker threads.
///
/// The resulting canvas is identical to `Camera::render`; rows may only
/// finish in a different order.
pub fn parallel_render(world: World, camera: Camera, threads: usize)
    -> Result<Canvas> {
    let vsize = camera.vsize;
    let hsize = camera.hsize;
    let mut canvas = Canvas::new(hsize, vsize);
    let (results_tx, results_rx) = mpsc::channel();

    info!("Rendering {}x{} using {} threads...", hsize, vsize, threads);
    {
        let mut thread_pool = ThreadPool::new(
            threads, world, camera, results_tx
        );

        for y in 0..vsize {
            thread_pool.execute(Message::Row(y));
        }

        if let Some(&id) = thread_pool.shutdown().first() {
            return Err(Error::WorkerPanicked(id));
        }
    }

    // Every worker has exited and dropped its sender, so this terminates.
    for (y, row) in results_rx.iter() {
        canvas.write_row(y, &row);
    }

    info!("...done.");
    Ok(canvas)
}

#[test]
fn parallel_render_matches_serial_render() {
    let world = World::new();
    let camera = Camera::new(40, 30, 1.0);

    let serial = camera.render(&world);
    let parallel = parallel_render(world, camera, 3).unwrap();

    assert_eq!(serial, parallel);
}

#[test]
fn more_threads_than_rows() {
    let world = World::new();
    let camera = Camera::new(8, 2, 1.0);

    let serial = camera.render(&world);
    let parallel = parallel_render(world, camera, 6).unwrap();

    assert_eq!(serial, parallel);
}
