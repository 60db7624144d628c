use crate::error::Result;

/// Вызываемый обработчик хоткея или таймера.
///
/// Вызывается только на потоке диспетчера. Ошибка вызова логируется
/// диспетчером и не влияет на остальные обработчики.
pub trait Invocable: Send {
    fn invoke(&self) -> Result<()>;
}

impl<F> Invocable for F
where
    F: Fn() -> Result<()> + Send,
{
    fn invoke(&self) -> Result<()> {
        self()
    }
}
