// Communication channels lock-free

use crate::messaging::command::{AudioCommand, Command};
use ringbuf::{HeapRb, traits::Split};

pub type CommandProducer = ringbuf::HeapProd<Command>;
pub type CommandConsumer = ringbuf::HeapCons<Command>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<Command>::new(capacity);
    rb.split()
}

pub type AudioCommandProducer = ringbuf::HeapProd<AudioCommand>;
pub type AudioCommandConsumer = ringbuf::HeapCons<AudioCommand>;

pub fn create_audio_channel(capacity: usize) -> (AudioCommandProducer, AudioCommandConsumer) {
    let rb = HeapRb::<AudioCommand>::new(capacity);
    rb.split()
}
