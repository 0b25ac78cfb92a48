mod xread_blocking;
